//! Adapter implementations for review polling ports.

pub mod memory;

mod http;
mod sleeper;
mod telegram;

pub use http::HttpStatusSource;
pub use sleeper::TokioSleeper;
pub use telegram::TelegramNotifier;
