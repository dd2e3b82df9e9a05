//! Review notifier: homework review status change notifications.
//!
//! The crate polls a homework status endpoint, detects when the review
//! status of the newest submission changes, and sends one Telegram message
//! per distinct change.
//!
//! # Architecture
//!
//! The notifier follows hexagonal architecture principles:
//!
//! - **Domain**: status vocabulary, payload validation and message rendering
//! - **Ports**: abstract traits for the status endpoint, the messaging
//!   channel and the inter-cycle delay
//! - **Adapters**: HTTP, Telegram and in-memory implementations of the ports
//!
//! # Modules
//!
//! - [`review`]: the poll, validate, extract, detect and notify cycle
//! - [`config`]: environment-driven configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod review;
pub mod telemetry;
