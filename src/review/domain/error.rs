//! Error types for review payload validation and record extraction.

use thiserror::Error;

/// Errors returned while validating status payloads and work item records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewDomainError {
    /// The value at the given location is not a JSON object.
    #[error("{location} must be a JSON object, got {found}")]
    NotAMapping {
        /// Which part of the payload was inspected.
        location: &'static str,
        /// JSON type name of the offending value.
        found: &'static str,
    },

    /// A required field is absent.
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    /// A field is present but carries the wrong JSON type.
    #[error("field '{field}' must be {expected}, got {found}")]
    InvalidFieldType {
        /// Field name.
        field: &'static str,
        /// Expected JSON type name.
        expected: &'static str,
        /// JSON type name that was found.
        found: &'static str,
    },

    /// The status value is outside the fixed review vocabulary.
    #[error(transparent)]
    UnknownStatus(#[from] ParseReviewStatusError),
}

impl ReviewDomainError {
    /// Returns `true` for shape violations, as opposed to vocabulary errors.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        !matches!(self, Self::UnknownStatus(_))
    }
}

/// Error returned when a status string is not part of the review vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review status: {0}")]
pub struct ParseReviewStatusError(pub String);

/// Returns the JSON type name used in diagnostics.
pub(crate) const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
