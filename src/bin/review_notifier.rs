//! Runs the review status notifier until the process is terminated.
//!
//! Usage:
//!
//! ```text
//! PRACTICUM_TOKEN=... TELEGRAM_TOKEN=... TELEGRAM_CHAT_ID=... review_notifier
//! ```
//!
//! Set `LOG_DIR` to also write daily-rotated log files.
//!
//! Missing credentials are fatal: the process exits with status 1 before
//! any client is built or any request is sent.

use mockable::DefaultClock;
use review_notifier::config::NotifierConfig;
use review_notifier::review::{
    adapters::{HttpStatusSource, TelegramNotifier, TokioSleeper},
    services::StatusPollService,
};
use review_notifier::telemetry;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::error;

/// Startup failures that prevent the poll loop from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] review_notifier::config::ConfigError),
    #[error("failed to build status endpoint client: {0}")]
    Source(#[from] review_notifier::review::ports::StatusSourceError),
    #[error("failed to build Telegram client: {0}")]
    Notifier(#[from] review_notifier::review::ports::NotifierError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
}

fn main() -> ExitCode {
    // Without a subscriber startup errors would vanish, so a failure here is
    // not fatal on its own. The guard flushes the log file on exit.
    let (telemetry_ready, _log_guard) = match telemetry::init() {
        Ok(guard) => (true, guard),
        Err(_) => (false, None),
    };
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if telemetry_ready {
                error!(error = %err, "review notifier cannot start");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config = NotifierConfig::from_env()?;
    let source = HttpStatusSource::new(config.endpoint(), config.practicum_token().clone())?;
    let notifier = TelegramNotifier::new(
        config.telegram_api_url(),
        config.telegram_token().clone(),
        config.telegram_chat_id(),
    )?;

    let service = StatusPollService::new(
        Arc::new(source),
        Arc::new(notifier),
        Arc::new(TokioSleeper),
        Arc::new(DefaultClock),
        config.poll_settings(),
    );

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StartupError::RuntimeInit)?;
    runtime.block_on(async {
        let state = service.initial_state();
        service.run(state, None).await;
    });
    Ok(())
}
