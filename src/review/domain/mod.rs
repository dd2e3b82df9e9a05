//! Domain model for review status tracking.
//!
//! The review domain owns the fixed status vocabulary, the shape checks
//! applied to status endpoint payloads, and the rendering of status change
//! messages. Transport and delivery concerns remain outside this boundary.

mod cursor;
mod error;
mod message;
mod payload;
mod record;
mod status;

pub use cursor::PollCursor;
pub use error::{ParseReviewStatusError, ReviewDomainError};
pub use message::StatusMessage;
pub use payload::{CURSOR_FIELD, RECORDS_FIELD, StatusPayload};
pub use record::{NAME_FIELD, STATUS_FIELD, WorkItemRecord, parse_status};
pub use status::ReviewStatus;
