//! The three status cards.

use demeter_core::Metric;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::colors::{metric_color, ph_color, temperature_color};
use super::theme::BORDER_TYPE;
use crate::tui::app::App;

/// Text and color for one card.
pub(super) struct Card {
    pub title: &'static str,
    pub value: String,
    pub status: &'static str,
    pub color: Color,
}

/// Build the cards for the current reading.
pub(super) fn cards(app: &App) -> [Card; 3] {
    let theme = app.app_theme();
    let reading = app.state().reading();
    let (temp_level, ph_level) = app.thresholds().evaluate_reading(reading);

    [
        Card {
            title: Metric::Temperature.name(),
            value: Metric::Temperature.format_value(reading.temperature),
            status: temp_level.description(),
            color: temperature_color(temp_level, &theme),
        },
        Card {
            title: Metric::Ph.name(),
            value: Metric::Ph.format_value(reading.ph),
            status: ph_level.description(),
            color: ph_color(ph_level, &theme),
        },
        Card {
            title: Metric::Ec.name(),
            value: Metric::Ec.format_value(reading.ec),
            status: "",
            color: metric_color(Metric::Ec),
        },
    ]
}

pub(super) fn draw_cards(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (card, column) in cards(app).into_iter().zip(columns.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BORDER_TYPE)
            .border_style(Style::default().fg(card.color))
            .title(Span::styled(
                format!(" {} ", card.title),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ));

        let lines = vec![
            Line::from(Span::styled(
                card.value,
                Style::default().fg(card.color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.status, Style::default().fg(theme.text_dim))),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, *column);
    }
}
