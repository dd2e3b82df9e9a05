//! Poll cursor bounding which updates the next request returns.

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt;

/// Lower bound (seconds since the Unix epoch) for the next status poll.
///
/// The cursor only moves forward: [`PollCursor::advance`] ignores values
/// older than the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollCursor(i64);

impl PollCursor {
    /// Creates a cursor from a raw epoch-seconds value.
    #[must_use]
    pub const fn from_epoch_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Creates a cursor positioned at the given instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.timestamp())
    }

    /// Creates a cursor positioned at the clock's current time.
    #[must_use]
    pub fn now(clock: &impl Clock) -> Self {
        Self::at(clock.utc())
    }

    /// Returns the epoch-seconds value sent as `from_date`.
    #[must_use]
    pub const fn epoch_seconds(self) -> i64 {
        self.0
    }

    /// Moves the cursor to `next` when it is not older than the current
    /// position. Returns `true` when the cursor changed.
    pub fn advance(&mut self, next: Self) -> bool {
        if next.0 > self.0 {
            self.0 = next.0;
            return true;
        }
        false
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
