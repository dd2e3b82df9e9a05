//! Inter-cycle delay port.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the poll loop between cycles.
///
/// Production code waits on the Tokio timer; tests substitute an adapter
/// that records the requested delay and returns immediately.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}
