//! In-memory adapters for deterministic poll loop tests.
//!
//! These adapters never touch the network or the wall clock. They record
//! every interaction so tests can assert on request cursors, delivered
//! messages and requested delays.

use crate::review::{
    domain::PollCursor,
    ports::{
        NotifierError, NotifierResult, Sleeper, StatusNotifier, StatusSource, StatusSourceError,
        StatusSourceResult,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Status source that replays a queue of scripted responses.
///
/// Once the script is exhausted every fetch fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStatusSource {
    state: Arc<Mutex<ScriptedSourceState>>,
}

#[derive(Debug, Default)]
struct ScriptedSourceState {
    responses: VecDeque<StatusSourceResult<Value>>,
    requested: Vec<PollCursor>,
}

impl ScriptedStatusSource {
    /// Creates a source with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a successful response body to the script.
    pub fn push_response(&self, body: Value) {
        self.push(Ok(body));
    }

    /// Appends a failure to the script.
    pub fn push_error(&self, error: StatusSourceError) {
        self.push(Err(error));
    }

    /// Returns the cursors passed to each fetch, in call order.
    #[must_use]
    pub fn requested_cursors(&self) -> Vec<PollCursor> {
        self.state
            .lock()
            .map(|state| state.requested.clone())
            .unwrap_or_default()
    }

    fn push(&self, response: StatusSourceResult<Value>) {
        if let Ok(mut state) = self.state.lock() {
            state.responses.push_back(response);
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn fetch(&self, cursor: PollCursor) -> StatusSourceResult<Value> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| StatusSourceError::transport(std::io::Error::other(err.to_string())))?;
        state.requested.push(cursor);
        state.responses.pop_front().unwrap_or_else(|| {
            Err(StatusSourceError::transport(std::io::Error::other(
                "no scripted response remaining",
            )))
        })
    }
}

/// Notifier that records delivered messages and can inject failures.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<Mutex<RecordingNotifierState>>,
}

#[derive(Debug, Default)]
struct RecordingNotifierState {
    delivered: Vec<String>,
    attempts: usize,
    pending_failures: VecDeque<NotifierError>,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next delivery attempt fail with `error`.
    ///
    /// Failures queue up; each attempt consumes one.
    pub fn fail_next(&self, error: NotifierError) {
        if let Ok(mut state) = self.state.lock() {
            state.pending_failures.push_back(error);
        }
    }

    /// Returns successfully delivered messages in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.delivered.clone())
            .unwrap_or_default()
    }

    /// Returns the number of delivery attempts, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.state.lock().map(|state| state.attempts).unwrap_or(0)
    }
}

#[async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> NotifierResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        state.attempts += 1;
        if let Some(failure) = state.pending_failures.pop_front() {
            return Err(failure);
        }
        state.delivered.push(text.to_owned());
        Ok(())
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    requested: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Creates a sleeper with no recorded delays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every requested delay in call order.
    #[must_use]
    pub fn requested(&self) -> Vec<Duration> {
        self.requested
            .lock()
            .map(|requested| requested.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(duration);
        }
    }
}
