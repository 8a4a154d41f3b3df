//! Dashboard state container.
//!
//! [`DashboardState`] is owned by the UI loop and changes only through
//! [`DashboardState::apply`]. Views receive `&DashboardState` each frame.

use time::OffsetDateTime;
use tracing::debug;

use demeter_types::{CurrentReading, HistoryPoint};

use crate::messages::DashboardEvent;
use crate::setpoint::SetpointOutcome;
use crate::window::{DEFAULT_HISTORY_CAPACITY, HistoryWindow};

/// Lifecycle of the all-time series. Exactly one of the three is shown.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AllTimeState {
    #[default]
    Loading,
    Loaded(Vec<HistoryPoint>),
    Failed(String),
}

impl AllTimeState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AllTimeState::Loading)
    }

    pub fn points(&self) -> Option<&[HistoryPoint]> {
        match self {
            AllTimeState::Loaded(points) => Some(points),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AllTimeState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Everything the dashboard knows about the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    reading: CurrentReading,
    connected: bool,
    history: HistoryWindow,
    all_time: AllTimeState,
    last_updated: Option<OffsetDateTime>,
    last_error: Option<String>,
    last_setpoint: Option<SetpointOutcome>,
    successful_polls: u64,
    failed_polls: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl DashboardState {
    /// Fresh state: zero reading, disconnected, empty history, all-time loading.
    pub fn new(history_capacity: usize) -> Self {
        Self {
            reading: CurrentReading::default(),
            connected: false,
            history: HistoryWindow::new(history_capacity),
            all_time: AllTimeState::Loading,
            last_updated: None,
            last_error: None,
            last_setpoint: None,
            successful_polls: 0,
            failed_polls: 0,
        }
    }

    /// Apply one poller event.
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::ReadingUpdated { reading, at } => {
                self.reading = reading;
                self.connected = true;
                self.last_updated = Some(at);
                self.last_error = None;
                self.successful_polls += 1;
            }
            DashboardEvent::ReadingFailed { error } => {
                self.connected = false;
                self.last_error = Some(error);
                self.failed_polls += 1;
            }
            DashboardEvent::HistoryLoaded(points) => {
                debug!(points = points.len(), "Replacing history window");
                self.history.replace(points);
            }
            DashboardEvent::HistoryFailed { error } => {
                debug!(%error, "Keeping previous history window");
            }
            DashboardEvent::AllTimeLoaded(points) => {
                self.all_time = AllTimeState::Loaded(points);
            }
            DashboardEvent::AllTimeFailed { error } => {
                self.all_time = AllTimeState::Failed(error);
            }
            DashboardEvent::SetpointSubmitted(outcome) => {
                self.last_setpoint = Some(outcome);
            }
        }
    }

    pub fn reading(&self) -> &CurrentReading {
        &self.reading
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn history(&self) -> &HistoryWindow {
        &self.history
    }

    pub fn all_time(&self) -> &AllTimeState {
        &self.all_time
    }

    /// When the last successful poll completed.
    pub fn last_updated(&self) -> Option<OffsetDateTime> {
        self.last_updated
    }

    /// Error from the most recent poll, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_setpoint(&self) -> Option<&SetpointOutcome> {
        self.last_setpoint.as_ref()
    }

    /// Forget the last setpoint outcome once it has been shown.
    pub fn clear_setpoint(&mut self) {
        self.last_setpoint = None;
    }

    pub fn successful_polls(&self) -> u64 {
        self.successful_polls
    }

    pub fn failed_polls(&self) -> u64 {
        self.failed_polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::sample_point;

    fn reading(t: f64) -> CurrentReading {
        CurrentReading {
            temperature: t,
            ph: 6.1,
            ec: 1.3,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardState::default();
        assert!(!state.is_connected());
        assert_eq!(*state.reading(), CurrentReading::default());
        assert!(state.all_time().is_loading());
        assert!(state.history().is_empty());
        assert_eq!(state.history().capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_failure_keeps_reading() {
        let mut state = DashboardState::default();
        state.apply(DashboardEvent::ReadingUpdated {
            reading: reading(22.0),
            at: OffsetDateTime::UNIX_EPOCH,
        });
        assert!(state.is_connected());

        let before = *state.reading();
        state.apply(DashboardEvent::ReadingFailed {
            error: "connection refused".into(),
        });
        assert!(!state.is_connected());
        assert_eq!(*state.reading(), before);
        assert_eq!(state.last_error(), Some("connection refused"));
        assert_eq!(state.last_updated(), Some(OffsetDateTime::UNIX_EPOCH));

        // Failing again is a no-op on the reading.
        state.apply(DashboardEvent::ReadingFailed {
            error: "connection refused".into(),
        });
        assert_eq!(*state.reading(), before);
        assert_eq!(state.failed_polls(), 2);
    }

    #[test]
    fn test_connectivity_flips_without_hysteresis() {
        let mut state = DashboardState::default();
        let at = OffsetDateTime::UNIX_EPOCH;
        for i in 0..4 {
            state.apply(DashboardEvent::ReadingFailed { error: "x".into() });
            assert!(!state.is_connected());
            state.apply(DashboardEvent::ReadingUpdated {
                reading: reading(20.0 + i as f64),
                at,
            });
            assert!(state.is_connected());
            assert_eq!(state.last_error(), None);
        }
        assert_eq!(state.reading().temperature, 23.0);
        assert_eq!(state.successful_polls(), 4);
    }

    #[test]
    fn test_history_failure_keeps_window() {
        let mut state = DashboardState::new(3);
        state.apply(DashboardEvent::HistoryLoaded(vec![
            sample_point("Mon", 20.0, 6.0, 1.0),
            sample_point("Tue", 21.0, 6.1, 1.1),
        ]));
        state.apply(DashboardEvent::HistoryFailed {
            error: "timeout".into(),
        });
        assert_eq!(state.history().labels(), vec!["Mon", "Tue"]);
    }

    #[test]
    fn test_history_replaced_and_capped() {
        let mut state = DashboardState::new(2);
        state.apply(DashboardEvent::HistoryLoaded(vec![
            sample_point("Mon", 20.0, 6.0, 1.0),
            sample_point("Tue", 21.0, 6.1, 1.1),
            sample_point("Wed", 22.0, 6.2, 1.2),
        ]));
        assert_eq!(state.history().labels(), vec!["Tue", "Wed"]);
    }

    #[test]
    fn test_all_time_transitions() {
        let mut state = DashboardState::default();
        assert!(state.all_time().points().is_none());
        assert!(state.all_time().error().is_none());

        let mut loaded = state.clone();
        loaded.apply(DashboardEvent::AllTimeLoaded(vec![sample_point("a", 1.0, 2.0, 3.0)]));
        assert_eq!(loaded.all_time().points().map(<[_]>::len), Some(1));
        assert!(loaded.all_time().error().is_none());

        state.apply(DashboardEvent::AllTimeFailed {
            error: "No data available".into(),
        });
        assert_eq!(state.all_time().error(), Some("No data available"));
        assert!(state.all_time().points().is_none());
        assert!(!state.all_time().is_loading());
    }

    #[test]
    fn test_setpoint_outcome_recorded() {
        let mut state = DashboardState::default();
        state.apply(DashboardEvent::SetpointSubmitted(SetpointOutcome::Accepted));
        assert_eq!(state.last_setpoint(), Some(&SetpointOutcome::Accepted));
        state.clear_setpoint();
        assert!(state.last_setpoint().is_none());
    }
}
