//! Trend and all-time line charts.

use demeter_core::{AllTimeState, Metric, series_of};
use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};

use super::colors::metric_color;
use super::theme::{AppTheme, BORDER_TYPE};
use crate::tui::app::App;

/// Shown over an empty chart.
pub(super) const NO_DATA: &str = "No data";
/// Shown until the all-time series arrives.
pub(super) const LOADING_ALL_TIME: &str = "Loading all-time data...";

/// One line on a chart.
struct Series {
    metric: Metric,
    points: Vec<(f64, f64)>,
}

/// Y-axis bounds covering every point, padded so lines clear the border.
pub(super) fn value_bounds<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> Option<[f64; 2]> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for points in series {
        for &(_, y) in points {
            if y.is_finite() {
                min = min.min(y);
                max = max.max(y);
            }
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    Some([min - pad, max + pad])
}

/// First, middle and last labels for the x-axis.
pub(super) fn axis_labels(labels: &[&str]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![labels[0].to_string()],
        2 => vec![labels[0].to_string(), labels[1].to_string()],
        n => vec![
            labels[0].to_string(),
            labels[n / 2].to_string(),
            labels[n - 1].to_string(),
        ],
    }
}

fn chart_block<'a>(title: String, theme: &AppTheme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_style())
        .title(Span::styled(title, theme.title_style()))
}

/// Render a line chart, or an empty chart with a notice when nothing is plottable.
fn render_chart(
    frame: &mut Frame,
    area: Rect,
    title: String,
    series: &[Series],
    labels: &[&str],
    theme: &AppTheme,
) {
    let block = chart_block(title, theme);
    let inner = block.inner(area);

    let Some([y_min, y_max]) = value_bounds(series.iter().map(|s| s.points.as_slice())) else {
        let chart = Chart::new(Vec::new())
            .block(block)
            .x_axis(Axis::default().bounds([0.0, 1.0]))
            .y_axis(Axis::default().bounds([0.0, 1.0]));
        frame.render_widget(chart, area);

        let notice = Paragraph::new(NO_DATA)
            .style(theme.muted_style())
            .alignment(Alignment::Center);
        let middle = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(notice, middle);
        return;
    };

    let x_max = labels.len().saturating_sub(1).max(1) as f64;

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.metric.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(metric_color(s.metric)))
                .data(&s.points)
        })
        .collect();

    let y_labels = vec![
        format!("{:.1}", y_min),
        format!("{:.1}", (y_min + y_max) / 2.0),
        format!("{:.1}", y_max),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme.muted_style())
                .bounds([0.0, x_max])
                .labels(axis_labels(labels)),
        )
        .y_axis(
            Axis::default()
                .style(theme.muted_style())
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn metric_title(app: &App) -> &'static str {
    match app.chart_metric {
        Some(metric) => metric.label(),
        None => "All metrics",
    }
}

/// Chart of the bounded history window.
pub(super) fn draw_trend_chart(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let history = app.state().history();
    let series: Vec<Series> = app
        .chart_metrics()
        .into_iter()
        .map(|metric| Series {
            metric,
            points: history.series(metric),
        })
        .collect();
    let labels = history.labels();
    let title = format!(
        " Trends | {} | last {} of {} ",
        metric_title(app),
        history.len(),
        history.capacity()
    );
    render_chart(frame, area, title, &series, &labels, &theme);
}

/// Chart of the all-time series: loading, error, or the chart itself.
pub(super) fn draw_all_time_chart(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    match app.state().all_time() {
        AllTimeState::Loading => {
            let block = chart_block(" All-Time ".to_string(), &theme);
            let paragraph = Paragraph::new(LOADING_ALL_TIME)
                .style(Style::default().fg(theme.text_dim))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
        }
        AllTimeState::Failed(message) => {
            let block = chart_block(" All-Time ".to_string(), &theme);
            let paragraph = Paragraph::new(format!("Error: {}", message))
                .style(Style::default().fg(theme.alert))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
        }
        AllTimeState::Loaded(points) => {
            let series: Vec<Series> = app
                .chart_metrics()
                .into_iter()
                .map(|metric| Series {
                    metric,
                    points: series_of(points, metric),
                })
                .collect();
            let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
            let title = format!(" All-Time | {} | {} points ", metric_title(app), points.len());
            render_chart(frame, area, title, &series, &labels, &theme);
        }
    }
}
