//! Shape validation for status endpoint responses.

use super::error::json_type_name;
use super::{PollCursor, ReviewDomainError};
use serde_json::{Map, Value};

/// Top-level field holding the sequence of work item records.
pub const RECORDS_FIELD: &str = "homeworks";

/// Top-level field holding the server-reported next cursor.
pub const CURSOR_FIELD: &str = "current_date";

/// A status endpoint response whose shape has been validated.
///
/// Records are kept as raw JSON entries, most recent first; each one is
/// validated separately by [`WorkItemRecord::from_value`](super::WorkItemRecord::from_value).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPayload {
    records: Vec<Value>,
    next_cursor: Option<PollCursor>,
}

impl StatusPayload {
    /// Validates a raw response body.
    ///
    /// A `current_date` value that is not an integer is ignored rather than
    /// rejected; the cursor then stays where it was.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::NotAMapping`] when the body is not an
    /// object, [`ReviewDomainError::MissingField`] when `homeworks` is absent
    /// or `null`, and [`ReviewDomainError::InvalidFieldType`] when `homeworks`
    /// is not an array.
    pub fn validate(raw: Value) -> Result<Self, ReviewDomainError> {
        let mut fields = into_object(raw)?;
        let records = match fields.remove(RECORDS_FIELD) {
            None | Some(Value::Null) => return Err(ReviewDomainError::MissingField(RECORDS_FIELD)),
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(ReviewDomainError::InvalidFieldType {
                    field: RECORDS_FIELD,
                    expected: "array",
                    found: json_type_name(&other),
                });
            }
        };
        let next_cursor = fields
            .get(CURSOR_FIELD)
            .and_then(Value::as_i64)
            .map(PollCursor::from_epoch_seconds);

        Ok(Self {
            records,
            next_cursor,
        })
    }

    /// Returns all record entries in server order.
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Returns the most recent record entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Value> {
        self.records.first()
    }

    /// Returns the cursor reported by the server, if any.
    #[must_use]
    pub const fn next_cursor(&self) -> Option<PollCursor> {
        self.next_cursor
    }
}

fn into_object(raw: Value) -> Result<Map<String, Value>, ReviewDomainError> {
    match raw {
        Value::Object(fields) => Ok(fields),
        other => Err(ReviewDomainError::NotAMapping {
            location: "status response",
            found: json_type_name(&other),
        }),
    }
}
