//! Review status vocabulary.

use super::ParseReviewStatusError;
use std::fmt;

/// Review outcome reported by the status endpoint.
///
/// The vocabulary is closed: any other wire value is rejected with
/// [`ParseReviewStatusError`] and never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    /// A reviewer has picked the work up.
    PendingReview,
    /// The work was accepted.
    Approved,
    /// The work was returned with remarks.
    Rejected,
}

impl ReviewStatus {
    /// Returns the wire representation used by the status endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "reviewing",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the canonical human description of the status.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PendingReview => "The work has been taken for review by a reviewer.",
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Rejected => "The work has been reviewed: the reviewer left remarks.",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = ParseReviewStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "reviewing" => Ok(Self::PendingReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseReviewStatusError(value.to_owned())),
        }
    }
}
