//! Work item records and the status message extractor.

use super::error::json_type_name;
use super::{ReviewDomainError, ReviewStatus, StatusMessage};
use serde_json::Value;

/// Record field carrying the work item identifier.
pub const NAME_FIELD: &str = "homework_name";

/// Record field carrying the review status.
pub const STATUS_FIELD: &str = "status";

/// One reviewable submission as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItemRecord {
    name: String,
    status: ReviewStatus,
}

impl WorkItemRecord {
    /// Creates a record from already validated parts.
    #[must_use]
    pub fn new(name: impl Into<String>, status: ReviewStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    /// Validates one entry of the `homeworks` sequence.
    ///
    /// A `null` field is treated the same as an absent one.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::NotAMapping`] when the entry is not an
    /// object, [`ReviewDomainError::MissingField`] naming the absent field,
    /// [`ReviewDomainError::InvalidFieldType`] when the name is not a string,
    /// or [`ReviewDomainError::UnknownStatus`] when the status is outside the
    /// review vocabulary.
    pub fn from_value(entry: &Value) -> Result<Self, ReviewDomainError> {
        let fields = entry.as_object().ok_or(ReviewDomainError::NotAMapping {
            location: "work item record",
            found: json_type_name(entry),
        })?;

        let name_value =
            present(fields.get(NAME_FIELD)).ok_or(ReviewDomainError::MissingField(NAME_FIELD))?;
        let status_value = present(fields.get(STATUS_FIELD))
            .ok_or(ReviewDomainError::MissingField(STATUS_FIELD))?;

        let name = name_value
            .as_str()
            .ok_or(ReviewDomainError::InvalidFieldType {
                field: NAME_FIELD,
                expected: "string",
                found: json_type_name(name_value),
            })?;

        let status = match status_value {
            Value::String(raw) => ReviewStatus::try_from(raw.as_str())?,
            other => ReviewStatus::try_from(other.to_string().as_str())?,
        };

        Ok(Self::new(name, status))
    }

    /// Returns the work item identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the review status.
    #[must_use]
    pub const fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Renders the status change message for this record.
    #[must_use]
    pub fn render(&self) -> StatusMessage {
        StatusMessage::for_record(self)
    }
}

/// Extracts a rendered status message from one validated payload entry.
///
/// # Errors
///
/// Returns the same errors as [`WorkItemRecord::from_value`].
pub fn parse_status(entry: &Value) -> Result<StatusMessage, ReviewDomainError> {
    WorkItemRecord::from_value(entry).map(|record| record.render())
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|inner| !inner.is_null())
}
