//! Logging setup for the notifier binary.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";
/// Environment variable naming the directory for rolling log files.
pub const LOG_DIR_VAR: &str = "LOG_DIR";
/// File name prefix of rolling log files.
pub const LOG_FILE_PREFIX: &str = "review_notifier";
/// Number of rotated log files kept on disk.
pub const MAX_LOG_FILES: usize = 5;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("tracing already initialised: {0}")]
    AlreadyInitialised(#[source] TryInitError),

    /// The log directory could not be created.
    #[error("cannot create log directory {}: {source}", .path.display())]
    LogDirectory {
        /// Requested directory.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The rolling log file could not be opened.
    #[error("cannot open rolling log file: {0}")]
    LogFile(#[from] InitError),
}

/// Builds the daily-rotated log file appender under `dir`.
///
/// Files are named `review_notifier.<date>.log`; only the newest
/// [`MAX_LOG_FILES`] are kept.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the directory cannot be created or the
/// file cannot be opened.
pub fn rolling_file_appender(dir: &Path) -> Result<RollingFileAppender, TelemetryError> {
    std::fs::create_dir_all(dir).map_err(|source| TelemetryError::LogDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;
    Ok(appender)
}

/// Installs the global `tracing` subscriber.
///
/// Log level comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Output goes to stderr so stdout stays free for the process supervisor.
/// When [`LOG_DIR_VAR`] names a directory, events are also written to a
/// rolling log file there; see [`init_with_log_dir`].
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init() -> Result<Option<WorkerGuard>, TelemetryError> {
    let log_dir = std::env::var_os(LOG_DIR_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    init_with_log_dir(log_dir.as_deref())
}

/// Installs the global subscriber, optionally adding a rolling file layer.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the life of the process. A log file that cannot be opened is not
/// fatal: the subscriber falls back to stderr only and logs a warning.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInitialised`] when a global subscriber
/// is already set.
pub fn init_with_log_dir(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let (file_layer, guard, file_error) = match log_dir.map(rolling_file_appender).transpose() {
        Ok(Some(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard), None)
        }
        Ok(None) => (None, None, None),
        Err(err) => (None, None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialised)?;

    if let Some(err) = file_error {
        warn!(error = %err, "log file unavailable; logging to stderr only");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    //! Unit tests for the rolling log file appender.

    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("review-notifier-{name}-{}", std::process::id()))
    }

    #[rstest]
    fn appender_creates_directory_and_prefixed_file() {
        let dir = scratch_dir("appender");
        let mut appender = rolling_file_appender(&dir).expect("appender should build");

        appender
            .write_all(b"status change notified\n")
            .expect("log line should be written");
        appender.flush().expect("log file should flush");

        let names: Vec<String> = std::fs::read_dir(&dir)
            .expect("log directory should exist")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names
                .iter()
                .any(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")),
            "unexpected log files: {names:?}"
        );
        std::fs::remove_dir_all(&dir).expect("scratch directory should be removed");
    }

    #[rstest]
    fn appender_rejects_directory_that_is_a_file() {
        let path = scratch_dir("not-a-dir");
        std::fs::write(&path, b"occupied").expect("scratch file should be written");

        let result = rolling_file_appender(&path);

        assert!(matches!(result, Err(TelemetryError::LogDirectory { .. })));
        std::fs::remove_file(&path).expect("scratch file should be removed");
    }
}
