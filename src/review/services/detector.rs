//! Change detection against the last delivered notification.

use crate::review::domain::StatusMessage;

/// The most recently delivered status message.
///
/// Starts empty, so the first observed message always counts as a change.
/// Only a confirmed delivery updates the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    last_delivered: Option<StatusMessage>,
}

impl NotificationState {
    /// Creates an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_delivered: None,
        }
    }

    /// Returns `true` when `message` differs from the last delivered one.
    #[must_use]
    pub fn should_notify(&self, message: &StatusMessage) -> bool {
        self.last_delivered.as_ref() != Some(message)
    }

    /// Records a successfully delivered message.
    pub fn record_delivered(&mut self, message: StatusMessage) {
        self.last_delivered = Some(message);
    }

    /// Returns the last delivered message, if any.
    #[must_use]
    pub const fn last_delivered(&self) -> Option<&StatusMessage> {
        self.last_delivered.as_ref()
    }
}
