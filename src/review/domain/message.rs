//! Rendered status change messages.

use super::WorkItemRecord;
use std::fmt;

/// Human-readable notification text for one work item status.
///
/// Messages compare by exact value; the change detector relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusMessage(String);

impl StatusMessage {
    /// Renders the message for a validated record.
    #[must_use]
    pub fn for_record(record: &WorkItemRecord) -> Self {
        Self(format!(
            "Status changed for \"{}\". {}",
            record.name(),
            record.status().description()
        ))
    }

    /// Returns the message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the message and returns its text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
