//! Messaging channel port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification delivery.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Delivers text messages to one fixed destination.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    /// Sends `text` to the configured destination.
    async fn notify(&self, text: &str) -> NotifierResult<()>;
}

/// Errors returned by notifier adapters.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The messaging service could not be reached.
    #[error("message delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),

    /// The messaging service refused the message.
    #[error("messaging service rejected the message (HTTP {status}): {description}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Service-provided reason.
        description: String,
    },
}

impl NotifierError {
    /// Wraps a delivery failure from the adapter.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
