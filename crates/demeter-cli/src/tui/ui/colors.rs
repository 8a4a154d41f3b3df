//! Color helpers for status cards and chart series.
//!
//! | pH band           | Color   |
//! |-------------------|---------|
//! | very acidic       | alert   |
//! | acidic            | caution |
//! | moderately acidic | good    |
//! | neutral           | caution |
//! | alkaline          | alert   |
//!
//! Temperature is blue when too cold, green when ideal and red when too hot.

use demeter_core::{Metric, PhLevel, TemperatureLevel};
use ratatui::style::Color;

use super::theme::AppTheme;

#[must_use]
pub fn ph_color(level: PhLevel, theme: &AppTheme) -> Color {
    match level {
        PhLevel::VeryAcidic | PhLevel::Alkaline => theme.alert,
        PhLevel::Acidic | PhLevel::Neutral => theme.caution,
        PhLevel::ModeratelyAcidic => theme.good,
        PhLevel::Unknown => theme.text_muted,
    }
}

#[must_use]
pub fn temperature_color(level: TemperatureLevel, theme: &AppTheme) -> Color {
    match level {
        TemperatureLevel::TooCold => theme.cool,
        TemperatureLevel::Ideal => theme.good,
        TemperatureLevel::TooHot => theme.alert,
        TemperatureLevel::Unknown => theme.text_muted,
    }
}

/// Series color of a metric.
#[must_use]
pub fn metric_color(metric: Metric) -> Color {
    let (r, g, b) = metric.rgb();
    Color::Rgb(r, g, b)
}

#[must_use]
pub fn connection_color(connected: bool, theme: &AppTheme) -> Color {
    if connected { theme.good } else { theme.alert }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_colors() {
        assert_eq!(metric_color(Metric::Temperature), Color::Rgb(0xff, 0x73, 0x00));
        assert_eq!(metric_color(Metric::Ph), Color::Rgb(0x38, 0x79, 0x08));
        assert_eq!(metric_color(Metric::Ec), Color::Rgb(0x88, 0x84, 0xd8));
    }

    #[test]
    fn test_ph_bands_use_distinct_severity() {
        let theme = AppTheme::dark();
        assert_eq!(ph_color(PhLevel::ModeratelyAcidic, &theme), theme.good);
        assert_eq!(ph_color(PhLevel::VeryAcidic, &theme), theme.alert);
        assert_eq!(ph_color(PhLevel::Alkaline, &theme), theme.alert);
        assert_eq!(ph_color(PhLevel::Unknown, &theme), theme.text_muted);
    }

    #[test]
    fn test_temperature_colors() {
        let theme = AppTheme::light();
        assert_eq!(temperature_color(TemperatureLevel::TooCold, &theme), theme.cool);
        assert_eq!(temperature_color(TemperatureLevel::TooHot, &theme), theme.alert);
        assert_eq!(connection_color(false, &theme), theme.alert);
    }
}
