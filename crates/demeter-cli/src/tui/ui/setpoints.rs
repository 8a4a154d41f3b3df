//! Collapsible setpoint panel.

use demeter_core::SetpointField;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::theme::BORDER_TYPE;
use crate::tui::app::App;

const PANEL_WIDTH: u16 = 44;
const PANEL_HEIGHT: u16 = 15;

/// Area of the panel: top-right, below the header and cards.
pub(super) fn panel_area(area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width);
    let height = PANEL_HEIGHT.min(area.height.saturating_sub(1));
    Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y + 1.min(area.height),
        width,
        height,
    )
}

pub(super) fn draw_setpoint_panel(frame: &mut Frame, app: &App) {
    if !app.panel_open() {
        return;
    }

    let theme = app.app_theme();
    let area = panel_area(frame.area());
    frame.render_widget(Clear, area);

    let form = app.form();
    let mut lines = Vec::new();

    for field in SetpointField::ALL {
        let focused = field == app.focused_field();
        let marker = if focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(
                field.label(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]));

        let text = form.field(field);
        let mut input = vec![Span::raw("  ")];
        if text.is_empty() {
            input.push(Span::styled(field.placeholder(), theme.muted_style()));
        } else {
            input.push(Span::styled(text.to_string(), Style::default().fg(theme.text)));
        }
        if focused {
            input.push(Span::styled("_", Style::default().fg(theme.accent)));
        }
        lines.push(Line::from(input));
    }

    lines.push(Line::from(""));

    if let Some(message) = form.error_message() {
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(theme.caution),
        )));
    }

    let submit_style = if app.is_submitting() || !form.is_submittable() {
        theme.muted_style()
    } else {
        Style::default().fg(theme.good).add_modifier(Modifier::BOLD)
    };
    let mut submit = vec![Span::styled("[ Submit ]", submit_style)];
    if app.is_submitting() {
        submit.push(Span::styled(" Sending...", Style::default().fg(theme.text_dim)));
    }
    lines.push(Line::from(submit));

    lines.push(Line::from(Span::styled(
        "Tab next | Enter submit | Del clear | Esc close",
        theme.muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_focus_style())
        .title(Span::styled(" Setpoints ", theme.title_style()))
        .style(Style::default().bg(theme.bg));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}
