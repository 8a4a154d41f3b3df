//! Message types for UI/poller communication.
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI loop       | --------------> |  Poller task     |
//! |  (ratatui/CLI)   |                 |  (tokio runtime) |
//! |                  | <-------------- |                  |
//! +------------------+ DashboardEvent  +------------------+
//! ```
//!
//! - [`Command`]: requests from the UI to the poller
//! - [`DashboardEvent`]: results from the poller, applied to
//!   [`crate::DashboardState`]

use time::OffsetDateTime;

use demeter_types::{CurrentReading, HistoryPoint, TargetValues};

use crate::setpoint::SetpointOutcome;

/// Commands sent from the UI to the poller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the current reading now instead of waiting for the next tick.
    RefreshReading,

    /// Send dosing targets to the device.
    SubmitSetpoints(TargetValues),

    /// Stop the poller.
    Shutdown,
}

/// Events sent from the poller back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A current-reading poll succeeded.
    ReadingUpdated {
        reading: CurrentReading,
        at: OffsetDateTime,
    },

    /// A current-reading poll failed.
    ReadingFailed { error: String },

    /// The windowed history fetch succeeded.
    HistoryLoaded(Vec<HistoryPoint>),

    /// The windowed history fetch failed.
    HistoryFailed { error: String },

    /// The all-time series arrived.
    AllTimeLoaded(Vec<HistoryPoint>),

    /// The all-time series could not be fetched.
    AllTimeFailed { error: String },

    /// A setpoint submission finished.
    SetpointSubmitted(SetpointOutcome),
}
