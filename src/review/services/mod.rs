//! Application services for review status polling.

mod detector;
mod poller;

pub use detector::NotificationState;
pub use poller::{
    CycleErrorKind, CycleFailure, CycleOutcome, CycleStage, PollCycleError, PollSettings,
    PollState, StatusPollService,
};
