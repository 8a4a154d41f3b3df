//! Application state for the TUI.
//!
//! [`App`] wraps the [`DashboardState`] fed by the poller and adds the
//! purely visual state: active tab, chart metric, setpoint panel visibility
//! and the form's text.

use std::time::{Duration, Instant};

use demeter_core::{
    DashboardEvent, DashboardState, Metric, SetpointField, SetpointForm, TargetValues,
    ThresholdConfig, Thresholds,
};
use tracing::debug;

use super::ui::theme::AppTheme;

/// How long a notification stays in the status bar.
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse a configured theme name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn palette(self) -> AppTheme {
        match self {
            Self::Dark => AppTheme::dark(),
            Self::Light => AppTheme::light(),
        }
    }
}

/// Chart tab selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// The bounded history window.
    #[default]
    Trends,
    /// The unbounded all-time series.
    AllTime,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Trends => "Trends",
            Tab::AllTime => "All-Time",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Tab::Trends => Tab::AllTime,
            Tab::AllTime => Tab::Trends,
        }
    }
}

/// Main application state.
pub struct App {
    state: DashboardState,
    thresholds: Thresholds,
    backend_url: String,
    /// Active chart tab.
    pub active_tab: Tab,
    /// Metric shown on the charts; `None` shows all of them.
    pub chart_metric: Option<Metric>,
    /// Current theme.
    pub theme: Theme,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    panel_open: bool,
    form: SetpointForm,
    focused: SetpointField,
    submitting: bool,
    should_quit: bool,
    notifications: Vec<(String, Instant)>,
}

impl App {
    pub fn new(
        backend_url: impl Into<String>,
        history_capacity: usize,
        thresholds: ThresholdConfig,
        theme: Theme,
        chart_metric: Option<Metric>,
    ) -> Self {
        Self {
            state: DashboardState::new(history_capacity),
            thresholds: Thresholds::new(thresholds),
            backend_url: backend_url.into(),
            active_tab: Tab::default(),
            chart_metric,
            theme,
            show_help: false,
            panel_open: false,
            form: SetpointForm::default(),
            focused: SetpointField::LowPh,
            submitting: false,
            should_quit: false,
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn app_theme(&self) -> AppTheme {
        self.theme.palette()
    }

    /// Apply a poller event to the dashboard state.
    pub fn handle_event(&mut self, event: DashboardEvent) {
        let was_connected = self.state.is_connected();
        let had_reading = self.state.successful_polls() > 0;

        self.state.apply(event);

        if let Some(outcome) = self.state.last_setpoint().cloned() {
            debug!(?outcome, "Setpoint submission finished");
            self.submitting = false;
            self.notify(outcome.notification());
            self.state.clear_setpoint();
        }

        let connected = self.state.is_connected();
        if was_connected && !connected {
            self.notify("Connection to the device lost");
        } else if !was_connected && connected && had_reading {
            self.notify("Connection to the device restored");
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ------------------------------------------------------------------
    // Setpoint panel
    // ------------------------------------------------------------------

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Label of the control that toggles the setpoint panel.
    pub fn panel_button_label(&self) -> &'static str {
        if self.panel_open {
            "Close Panel"
        } else {
            "Open Panel"
        }
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    pub fn form(&self) -> &SetpointForm {
        &self.form
    }

    pub fn focused_field(&self) -> SetpointField {
        self.focused
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.prev();
    }

    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.form.field_mut(self.focused).push(c);
        }
    }

    pub fn input_backspace(&mut self) {
        self.form.field_mut(self.focused).pop();
    }

    pub fn clear_field(&mut self) {
        self.form.field_mut(self.focused).clear();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validate the form and mark a submission as in flight.
    ///
    /// Returns `None` while the form is invalid or a submission is pending.
    /// The form text is left in place after submitting.
    pub fn prepare_submit(&mut self) -> Option<TargetValues> {
        if self.submitting {
            return None;
        }
        let values = self.form.validate().ok()?;
        self.submitting = true;
        Some(values)
    }

    /// Undo [`App::prepare_submit`] when the command could not be queued.
    pub fn submit_failed(&mut self, reason: &str) {
        self.submitting = false;
        self.notify(reason);
    }

    // ------------------------------------------------------------------
    // View controls
    // ------------------------------------------------------------------

    /// Cycle all -> temperature -> pH -> EC -> all.
    pub fn cycle_metric(&mut self) {
        self.chart_metric = match self.chart_metric {
            None => Some(Metric::Temperature),
            Some(Metric::Ec) => None,
            Some(metric) => Some(metric.next()),
        };
    }

    /// Metrics drawn on the charts, in display order.
    pub fn chart_metrics(&self) -> Vec<Metric> {
        match self.chart_metric {
            Some(metric) => vec![metric],
            None => Metric::ALL.to_vec(),
        }
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.toggle();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push((message.into(), Instant::now()));
        // Keep at most 5 messages
        while self.notifications.len() > 5 {
            self.notifications.remove(0);
        }
    }

    pub fn clean_expired_notifications(&mut self) {
        self.notifications
            .retain(|(_, created)| created.elapsed() < NOTIFICATION_TIMEOUT);
    }

    pub fn current_notification(&self) -> Option<&str> {
        self.notifications.last().map(|(msg, _)| msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demeter_core::{CurrentReading, SetpointOutcome, VALIDATION_MESSAGE};
    use time::OffsetDateTime;

    fn app() -> App {
        App::new(
            "http://localhost:5000",
            7,
            ThresholdConfig::default(),
            Theme::Dark,
            None,
        )
    }

    fn updated(t: f64) -> DashboardEvent {
        DashboardEvent::ReadingUpdated {
            reading: CurrentReading {
                temperature: t,
                ph: 6.0,
                ec: 1.2,
            },
            at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn test_panel_starts_collapsed() {
        let mut app = app();
        assert!(!app.panel_open());
        assert_eq!(app.panel_button_label(), "Open Panel");
        app.toggle_panel();
        assert!(app.panel_open());
        assert_eq!(app.panel_button_label(), "Close Panel");
        app.close_panel();
        assert!(!app.panel_open());
    }

    #[test]
    fn test_submit_blocked_until_valid() {
        let mut app = app();
        assert_eq!(app.form().error_message(), Some(VALIDATION_MESSAGE));
        assert!(app.prepare_submit().is_none());

        type_text(&mut app, "5.5");
        app.focus_next();
        type_text(&mut app, "6.4");
        assert!(app.prepare_submit().is_none());

        app.focus_next();
        type_text(&mut app, "1800");
        let values = app.prepare_submit().unwrap();
        assert_eq!(values.low_ph, 5.5);
        assert_eq!(values.high_ph, 6.4);
        assert_eq!(values.low_ec, 1800.0);
        assert!(app.is_submitting());

        // A second submit waits for the first outcome.
        assert!(app.prepare_submit().is_none());
    }

    #[test]
    fn test_outcome_notifies_and_keeps_text() {
        let mut app = app();
        app.form = SetpointForm::new("5.5", "6.4", "1800");
        app.prepare_submit().unwrap();

        app.handle_event(DashboardEvent::SetpointSubmitted(SetpointOutcome::Rejected {
            status: 500,
            message: "boom".into(),
        }));
        assert!(!app.is_submitting());
        assert_eq!(
            app.current_notification(),
            Some("Failed to send data to the device.")
        );
        assert!(app.state().last_setpoint().is_none());
        assert_eq!(app.form().field(SetpointField::EcHigh), "1800");
    }

    #[test]
    fn test_editing_focused_field() {
        let mut app = app();
        app.focus_previous();
        assert_eq!(app.focused_field(), SetpointField::EcHigh);
        type_text(&mut app, "12x");
        app.input_backspace();
        assert_eq!(app.form().field(SetpointField::EcHigh), "12");
        app.input_char('\u{7}');
        assert_eq!(app.form().field(SetpointField::EcHigh), "12");
        app.clear_field();
        assert_eq!(app.form().field(SetpointField::EcHigh), "");
    }

    #[test]
    fn test_connectivity_notifications() {
        let mut app = app();
        app.handle_event(DashboardEvent::ReadingFailed { error: "x".into() });
        // Never connected yet, nothing to report.
        assert_eq!(app.current_notification(), None);

        app.handle_event(updated(21.0));
        assert_eq!(app.current_notification(), None);

        app.handle_event(DashboardEvent::ReadingFailed { error: "x".into() });
        assert_eq!(
            app.current_notification(),
            Some("Connection to the device lost")
        );
        assert_eq!(app.state().reading().temperature, 21.0);

        app.handle_event(updated(22.0));
        assert_eq!(
            app.current_notification(),
            Some("Connection to the device restored")
        );
    }

    #[test]
    fn test_cycle_metric() {
        let mut app = app();
        assert_eq!(app.chart_metrics(), Metric::ALL.to_vec());
        app.cycle_metric();
        assert_eq!(app.chart_metric, Some(Metric::Temperature));
        app.cycle_metric();
        app.cycle_metric();
        assert_eq!(app.chart_metrics(), vec![Metric::Ec]);
        app.cycle_metric();
        assert_eq!(app.chart_metric, None);
    }

    #[test]
    fn test_notifications_capped() {
        let mut app = app();
        for i in 0..8 {
            app.notify(format!("msg {i}"));
        }
        assert_eq!(app.notifications.len(), 5);
        assert_eq!(app.current_notification(), Some("msg 7"));
        app.clean_expired_notifications();
        assert_eq!(app.notifications.len(), 5);
    }

    #[test]
    fn test_theme_from_name() {
        assert_eq!(Theme::from_name("Light"), Theme::Light);
        assert_eq!(Theme::from_name("dark"), Theme::Dark);
        assert_eq!(Theme::from_name("solarized"), Theme::Dark);
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
    }
}
