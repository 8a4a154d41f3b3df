//! Main UI layout and rendering for the dashboard.
//!
//! The layout consists of:
//!
//! - **Header**: title, connectivity and last update time
//! - **Cards**: temperature, pH and EC
//! - **Charts**: trend window and all-time series, one tab each
//! - **Status bar**: hints or the latest notification, plus the clock
//!
//! The setpoint panel and help are drawn as overlays.

pub mod colors;
pub mod theme;

mod cards;
mod charts;
mod overlays;
mod setpoints;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use time::OffsetDateTime;

use super::app::{App, Tab, Theme};
use colors::connection_color;
use theme::BORDER_TYPE;

/// Draw the complete dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = app.app_theme();

    if matches!(app.theme, Theme::Light) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg)),
            frame.area(),
        );
    }

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(5), // Cards
            Constraint::Length(2), // Tab bar
            Constraint::Min(1),    // Chart
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);
    cards::draw_cards(frame, main_layout[1], app);
    draw_tab_bar(frame, main_layout[2], app);

    match app.active_tab {
        Tab::Trends => charts::draw_trend_chart(frame, main_layout[3], app),
        Tab::AllTime => charts::draw_all_time_chart(frame, main_layout[3], app),
    }

    draw_status_bar(frame, main_layout[4], app);

    setpoints::draw_setpoint_panel(frame, app);

    if app.show_help {
        overlays::draw_help_overlay(frame, app);
    }
}

fn clock(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let state = app.state();
    let connected = state.is_connected();

    let mut spans = vec![
        Span::styled(
            " Demeter Dashboard ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if connected {
                " ● Connected "
            } else {
                " ● Disconnected "
            },
            Style::default().fg(connection_color(connected, &theme)),
        ),
        Span::styled(
            format!(" {} ", app.backend_url()),
            Style::default().fg(theme.text_muted),
        ),
    ];

    if let Some(at) = state.last_updated() {
        spans.push(Span::styled(
            format!(" Updated {} ", clock(at)),
            Style::default().fg(theme.text_dim),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let tabs = [Tab::Trends, Tab::AllTime];

    let titles: Vec<Line> = tabs
        .iter()
        .map(|tab| {
            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.text_muted)
            };
            Line::from(Span::styled(format!(" {} ", tab.label()), style))
        })
        .collect();

    let selected = tabs.iter().position(|t| *t == app.active_tab).unwrap_or(0);
    let widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BORDER_TYPE)
                .border_style(theme.border_style()),
        )
        .highlight_style(Style::default().fg(theme.accent))
        .divider(Span::styled(" | ", Style::default().fg(theme.text_muted)))
        .select(selected);

    frame.render_widget(widget, area);
}

fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    vec![
        ("?", "help"),
        ("Tab", "chart"),
        ("m", "metric"),
        ("r", "refresh"),
        ("p", app.panel_button_label()),
        ("q", "quit"),
    ]
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let time_str = Local::now().format("%H:%M:%S").to_string();

    let left_spans = if let Some(msg) = app.current_notification() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.text_dim),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in hints(app).into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                key,
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!(" {}", desc), theme.muted_style()));
        }
        spans
    };

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), layout[0]);
    frame.render_widget(
        Paragraph::new(time_str)
            .style(theme.muted_style())
            .alignment(Alignment::Right),
        layout[1],
    );
}
