//! Keyboard input handling for the TUI.
//!
//! # Key Bindings
//!
//! | Key             | Action                          |
//! |-----------------|---------------------------------|
//! | `q`             | Quit                            |
//! | `r`             | Refresh the current reading     |
//! | `p`             | Open/close the setpoint panel   |
//! | `Tab` / `l`     | Switch chart tab                |
//! | `m`             | Cycle chart metric              |
//! | `t`             | Toggle theme                    |
//! | `?`             | Toggle help                     |
//!
//! While the setpoint panel is open, keys edit the focused field:
//! `Tab`/`↓` and `BackTab`/`↑` move between fields, `Enter` submits,
//! `Del` clears the field and `Esc` closes the panel.

use crossterm::event::KeyCode;

use demeter_core::Command;

use super::app::App;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Poll the current reading now.
    Refresh,
    /// Open or close the setpoint panel.
    TogglePanel,
    /// Close the setpoint panel.
    ClosePanel,
    /// Switch between the trend and all-time charts.
    NextTab,
    /// Cycle the metric shown on the charts.
    CycleMetric,
    /// Toggle theme.
    ToggleTheme,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Close whichever overlay is on top.
    Dismiss,
    /// Focus the next setpoint field.
    FocusNext,
    /// Focus the previous setpoint field.
    FocusPrevious,
    /// Type a character into the focused field.
    TextInput(char),
    /// Delete the last character of the focused field.
    TextBackspace,
    /// Clear the focused field.
    TextClear,
    /// Submit the setpoint form.
    Submit,
    /// No action (unrecognized key).
    None,
}

/// Map a key code to an action.
pub fn handle_key(key: KeyCode, panel_open: bool) -> Action {
    if panel_open {
        return match key {
            KeyCode::Enter => Action::Submit,
            KeyCode::Esc => Action::ClosePanel,
            KeyCode::Tab | KeyCode::Down => Action::FocusNext,
            KeyCode::BackTab | KeyCode::Up => Action::FocusPrevious,
            KeyCode::Backspace => Action::TextBackspace,
            KeyCode::Delete => Action::TextClear,
            KeyCode::Char(c) => Action::TextInput(c),
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('p') | KeyCode::Char('s') => Action::TogglePanel,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('l') | KeyCode::Char('h') => {
            Action::NextTab
        }
        KeyCode::Char('m') => Action::CycleMetric,
        KeyCode::Char('t') => Action::ToggleTheme,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Dismiss,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns `Some(Command)` when the poller has to do something.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => app.quit(),
        Action::Refresh => return Some(Command::RefreshReading),
        Action::TogglePanel => app.toggle_panel(),
        Action::ClosePanel => app.close_panel(),
        Action::NextTab => app.next_tab(),
        Action::CycleMetric => app.cycle_metric(),
        Action::ToggleTheme => app.toggle_theme(),
        Action::ToggleHelp => app.show_help = !app.show_help,
        Action::Dismiss => app.show_help = false,
        Action::FocusNext => app.focus_next(),
        Action::FocusPrevious => app.focus_previous(),
        Action::TextInput(c) => app.input_char(c),
        Action::TextBackspace => app.input_backspace(),
        Action::TextClear => app.clear_field(),
        Action::Submit => return app.prepare_submit().map(Command::SubmitSetpoints),
        Action::None => {}
    }
    None
}
