//! Port contracts for review status polling.

mod notifier;
mod sleeper;
mod source;

pub use notifier::{NotifierError, NotifierResult, StatusNotifier};
pub use sleeper::Sleeper;
pub use source::{StatusSource, StatusSourceError, StatusSourceResult};
