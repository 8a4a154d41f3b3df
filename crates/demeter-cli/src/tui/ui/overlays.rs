//! Popup overlays drawn on top of the dashboard.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// A rect of the given size centered in `area`, clamped to fit.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn shortcut_line<'a>(key: &'a str, desc: &'a str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>10} ", key), Style::default().fg(theme.caution)),
        Span::styled(desc, Style::default().fg(theme.text_dim)),
    ])
}

fn section<'a>(title: &'a str, theme: &AppTheme) -> Line<'a> {
    Line::from(Span::styled(
        title,
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))
}

pub(super) fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let theme = app.app_theme();
    let area = centered_rect(48, 22, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        section("--- Dashboard ---", &theme),
        shortcut_line("Tab/l/h", "Switch chart tab", &theme),
        shortcut_line("m", "Cycle chart metric", &theme),
        shortcut_line("r", "Refresh reading", &theme),
        shortcut_line("p", app.panel_button_label(), &theme),
        shortcut_line("t", "Toggle theme", &theme),
        shortcut_line("?", "Toggle help", &theme),
        shortcut_line("q", "Quit", &theme),
        Line::from(""),
        section("--- Setpoint panel ---", &theme),
        shortcut_line("Tab/Down", "Next field", &theme),
        shortcut_line("S-Tab/Up", "Previous field", &theme),
        shortcut_line("Enter", "Submit", &theme),
        shortcut_line("Del", "Clear field", &theme),
        shortcut_line("Esc", "Close panel", &theme),
        Line::from(""),
        Line::from(Span::styled("Press ? or Esc to close", theme.muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_focus_style())
        .title(Span::styled(" Keyboard Shortcuts ", theme.title_style()))
        .style(Style::default().bg(theme.bg));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(20, 10, Rect::new(0, 0, 100, 50));
        assert_eq!(rect, Rect::new(40, 20, 20, 10));
    }

    #[test]
    fn test_centered_rect_clamps() {
        let rect = centered_rect(200, 100, Rect::new(5, 5, 40, 20));
        assert_eq!(rect, Rect::new(5, 5, 40, 20));
    }
}
