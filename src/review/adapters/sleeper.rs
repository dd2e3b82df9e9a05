//! Tokio-backed inter-cycle delay.

use crate::review::ports::Sleeper;
use async_trait::async_trait;
use std::time::Duration;

/// Waits on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
