//! Poll loop controller: poll, validate, extract, detect, notify, sleep.

use super::NotificationState;
use crate::review::{
    domain::{PollCursor, ReviewDomainError, StatusMessage, StatusPayload, parse_status},
    ports::{NotifierError, Sleeper, StatusNotifier, StatusSource, StatusSourceError},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Prefix of failure reports sent to the chat.
const FAILURE_REPORT_PREFIX: &str = "Program failure";

/// Upper bound on failure report length, well under the Telegram message
/// limit of 4096 characters.
const MAX_FAILURE_REPORT_CHARS: usize = 1024;

/// Tunables for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    interval: Duration,
    report_failures: bool,
}

impl PollSettings {
    /// Creates settings with the given delay between cycles.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            report_failures: false,
        }
    }

    /// Enables or disables failure reports to the chat.
    #[must_use]
    pub const fn with_failure_reports(mut self, enabled: bool) -> Self {
        self.report_failures = enabled;
        self
    }

    /// Returns the delay between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns whether cycle failures are reported to the chat.
    #[must_use]
    pub const fn reports_failures(&self) -> bool {
        self.report_failures
    }
}

/// Process-lifetime loop state: the cursor and notification history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    cursor: PollCursor,
    notifications: NotificationState,
    last_failure_report: Option<String>,
}

impl PollState {
    /// Creates a fresh state polling from `cursor`.
    #[must_use]
    pub const fn starting_at(cursor: PollCursor) -> Self {
        Self {
            cursor,
            notifications: NotificationState::new(),
            last_failure_report: None,
        }
    }

    /// Returns the cursor sent with the next poll.
    #[must_use]
    pub const fn cursor(&self) -> PollCursor {
        self.cursor
    }

    /// Returns the last delivered status message, if any.
    #[must_use]
    pub const fn last_notified(&self) -> Option<&StatusMessage> {
        self.notifications.last_delivered()
    }

    /// Returns the last failure report sent to the chat, if any.
    #[must_use]
    pub fn last_failure_report(&self) -> Option<&str> {
        self.last_failure_report.as_deref()
    }
}

/// Cycle stage at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleStage {
    /// Requesting the status endpoint.
    Polling,
    /// Checking the response shape.
    Validating,
    /// Rendering the newest record.
    Extracting,
    /// Delivering the notification.
    Notifying,
}

impl CycleStage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Validating => "validating",
            Self::Extracting => "extracting",
            Self::Notifying => "notifying",
        }
    }
}

impl fmt::Display for CycleStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Closed set of errors a cycle can end with.
#[derive(Debug, Clone, Error)]
pub enum PollCycleError {
    /// The status endpoint request failed.
    #[error(transparent)]
    Source(#[from] StatusSourceError),
    /// The response or a record failed validation.
    #[error(transparent)]
    Domain(#[from] ReviewDomainError),
    /// The notification could not be delivered.
    #[error(transparent)]
    Notification(#[from] NotifierError),
}

/// Classification of [`PollCycleError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleErrorKind {
    /// Network or connection failure reaching the endpoint.
    Transport,
    /// The endpoint answered with a non-success status code.
    StatusCode,
    /// The payload is missing fields or has the wrong shape.
    Schema,
    /// A status value is outside the review vocabulary.
    UnknownStatus,
    /// Delivery to the messaging destination failed.
    Notification,
}

impl PollCycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> CycleErrorKind {
        match self {
            Self::Source(StatusSourceError::Transport(_)) => CycleErrorKind::Transport,
            Self::Source(StatusSourceError::UnexpectedStatus { .. }) => CycleErrorKind::StatusCode,
            Self::Source(StatusSourceError::Decode(_)) => CycleErrorKind::Schema,
            Self::Domain(ReviewDomainError::UnknownStatus(_)) => CycleErrorKind::UnknownStatus,
            Self::Domain(_) => CycleErrorKind::Schema,
            Self::Notification(_) => CycleErrorKind::Notification,
        }
    }
}

/// A failed cycle: where it stopped and why.
#[derive(Debug, Clone, Error)]
#[error("{stage} stage failed: {error}")]
pub struct CycleFailure {
    stage: CycleStage,
    #[source]
    error: PollCycleError,
}

impl CycleFailure {
    /// Creates a failure record.
    pub fn new(stage: CycleStage, error: impl Into<PollCycleError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }

    /// Returns the stage that failed.
    #[must_use]
    pub const fn stage(&self) -> CycleStage {
        self.stage
    }

    /// Returns the underlying error.
    #[must_use]
    pub const fn error(&self) -> &PollCycleError {
        &self.error
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> CycleErrorKind {
        self.error.kind()
    }
}

/// Result of one poll cycle.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// A changed status was delivered.
    Notified(StatusMessage),
    /// The newest status matches the last delivered message.
    Unchanged(StatusMessage),
    /// The endpoint reported no work items.
    NoUpdates,
    /// A changed status was detected but could not be delivered; it is not
    /// recorded as notified.
    NotificationFailed {
        /// The message that was not delivered.
        message: StatusMessage,
        /// Why delivery failed.
        error: NotifierError,
    },
    /// The cycle stopped early; state was left untouched.
    Failed(CycleFailure),
}

impl CycleOutcome {
    /// Returns the failure, if the cycle failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&CycleFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Notified(_)
            | Self::Unchanged(_)
            | Self::NoUpdates
            | Self::NotificationFailed { .. } => None,
        }
    }
}

/// Drives the poll cycle against injected ports.
///
/// The service owns no mutable state; callers hold a [`PollState`] and pass
/// it into each cycle.
#[derive(Clone)]
pub struct StatusPollService<S, N, P, C>
where
    S: StatusSource,
    N: StatusNotifier,
    P: Sleeper,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    notifier: Arc<N>,
    sleeper: Arc<P>,
    clock: Arc<C>,
    settings: PollSettings,
}

impl<S, N, P, C> StatusPollService<S, N, P, C>
where
    S: StatusSource,
    N: StatusNotifier,
    P: Sleeper,
    C: Clock + Send + Sync,
{
    /// Creates a poll service.
    #[must_use]
    pub const fn new(
        source: Arc<S>,
        notifier: Arc<N>,
        sleeper: Arc<P>,
        clock: Arc<C>,
        settings: PollSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            sleeper,
            clock,
            settings,
        }
    }

    /// Creates the initial loop state, with the cursor at the current time.
    #[must_use]
    pub fn initial_state(&self) -> PollState {
        PollState::starting_at(PollCursor::now(&*self.clock))
    }

    /// Runs one cycle without the trailing delay.
    ///
    /// Failures never escape: they are logged, classified and returned in
    /// [`CycleOutcome::Failed`], or [`CycleOutcome::NotificationFailed`] when
    /// a detected change could not be delivered. On failure the notification
    /// state is left untouched; the cursor only moves after a successful
    /// validation.
    pub async fn run_cycle(&self, state: &mut PollState) -> CycleOutcome {
        let outcome = match self.execute_cycle(state).await {
            Ok(outcome) => outcome,
            Err(failure) => CycleOutcome::Failed(failure),
        };
        log_outcome(state, &outcome);
        if self.settings.report_failures {
            self.report_failure(state, &outcome).await;
        }
        outcome
    }

    /// Runs one cycle followed by the configured delay.
    ///
    /// The delay runs whatever the outcome, which bounds the poll rate.
    pub async fn tick(&self, state: &mut PollState) -> CycleOutcome {
        let outcome = self.run_cycle(state).await;
        self.sleeper.sleep(self.settings.interval).await;
        outcome
    }

    /// Runs cycles until `max_cycles` have completed, or forever when
    /// `max_cycles` is `None`. Returns the final state.
    pub async fn run(&self, mut state: PollState, max_cycles: Option<u64>) -> PollState {
        info!(
            cursor = %state.cursor(),
            interval_secs = self.settings.interval.as_secs(),
            "starting status poll loop"
        );
        let mut completed: u64 = 0;
        while max_cycles.is_none_or(|limit| completed < limit) {
            self.tick(&mut state).await;
            completed = completed.saturating_add(1);
        }
        state
    }

    async fn execute_cycle(&self, state: &mut PollState) -> Result<CycleOutcome, CycleFailure> {
        let raw = self
            .source
            .fetch(state.cursor)
            .await
            .map_err(|err| CycleFailure::new(CycleStage::Polling, err))?;

        let payload = StatusPayload::validate(raw)
            .map_err(|err| CycleFailure::new(CycleStage::Validating, err))?;
        if let Some(next) = payload.next_cursor()
            && state.cursor.advance(next)
        {
            debug!(cursor = %state.cursor, "advanced poll cursor");
        }

        let Some(latest) = payload.latest() else {
            return Ok(CycleOutcome::NoUpdates);
        };
        let message =
            parse_status(latest).map_err(|err| CycleFailure::new(CycleStage::Extracting, err))?;

        if !state.notifications.should_notify(&message) {
            return Ok(CycleOutcome::Unchanged(message));
        }

        if let Err(error) = self.notifier.notify(message.as_str()).await {
            return Ok(CycleOutcome::NotificationFailed { message, error });
        }
        state.notifications.record_delivered(message.clone());
        Ok(CycleOutcome::Notified(message))
    }

    async fn report_failure(&self, state: &mut PollState, outcome: &CycleOutcome) {
        let failure = match outcome {
            CycleOutcome::Failed(failure) => failure,
            // The notifier itself is broken; reporting through it would fail too.
            CycleOutcome::NotificationFailed { .. } => return,
            CycleOutcome::Notified(_) | CycleOutcome::Unchanged(_) | CycleOutcome::NoUpdates => {
                state.last_failure_report = None;
                return;
            }
        };

        let report = failure_report(failure);
        if state.last_failure_report.as_deref() == Some(report.as_str()) {
            return;
        }
        match self.notifier.notify(&report).await {
            Ok(()) => state.last_failure_report = Some(report),
            Err(err) => warn!(error = %err, "failed to deliver failure report"),
        }
    }
}

fn log_outcome(state: &PollState, outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Notified(message) => {
            info!(cursor = %state.cursor, message = %message, "status change notified");
        }
        CycleOutcome::Unchanged(_) => debug!(cursor = %state.cursor, "status unchanged"),
        CycleOutcome::NoUpdates => debug!(cursor = %state.cursor, "no homework updates"),
        CycleOutcome::NotificationFailed { error, .. } => {
            log_failure(state, &CycleFailure::new(CycleStage::Notifying, error.clone()));
        }
        CycleOutcome::Failed(failure) => log_failure(state, failure),
    }
}

/// Builds the chat report for a failed cycle.
///
/// Response bodies are left out: they can be arbitrarily large and vary
/// between otherwise identical failures.
fn failure_report(failure: &CycleFailure) -> String {
    let detail = match failure.error() {
        PollCycleError::Source(StatusSourceError::UnexpectedStatus { status, .. }) => {
            format!("status endpoint returned HTTP {status}")
        }
        other => other.to_string(),
    };
    let mut report = format!("{FAILURE_REPORT_PREFIX}: {} stage failed: {detail}", failure.stage());
    if report.chars().count() > MAX_FAILURE_REPORT_CHARS {
        report = report.chars().take(MAX_FAILURE_REPORT_CHARS).collect();
    }
    report
}

fn log_failure(state: &PollState, failure: &CycleFailure) {
    let stage = failure.stage().as_str();
    let cursor = state.cursor;
    let error = failure.error();
    match failure.kind() {
        CycleErrorKind::Transport | CycleErrorKind::StatusCode => {
            warn!(stage, %cursor, %error, "status poll failed");
        }
        CycleErrorKind::Schema => {
            error!(stage, %cursor, %error, "status response has an unexpected shape");
        }
        CycleErrorKind::UnknownStatus => {
            error!(stage, %cursor, %error, "status response carries an unknown review status");
        }
        CycleErrorKind::Notification => {
            error!(stage, %cursor, %error, "failed to deliver status notification");
        }
    }
}
