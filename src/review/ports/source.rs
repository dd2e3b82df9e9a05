//! Status endpoint port.

use crate::review::domain::PollCursor;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status source operations.
pub type StatusSourceResult<T> = Result<T, StatusSourceError>;

/// Single-request access to the homework status endpoint.
///
/// Implementations perform exactly one request per call and never retry;
/// retrying is the poll loop's job.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches the raw response body for updates since `cursor`.
    async fn fetch(&self, cursor: PollCursor) -> StatusSourceResult<Value>;
}

/// Errors returned by status source adapters.
#[derive(Debug, Clone, Error)]
pub enum StatusSourceError {
    /// The endpoint could not be reached.
    #[error("status endpoint request failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The endpoint answered with a non-success status code.
    #[error("status endpoint returned HTTP {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("status endpoint returned an undecodable body: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusSourceError {
    /// Wraps a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a body decoding failure.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }
}
