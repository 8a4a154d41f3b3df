//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use demeter_core::{
    CurrentReading, HistoryPoint, HistoryRange, Metric, PhLevel, TargetValues, TemperatureLevel,
    ThresholdConfig, Thresholds,
};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Bands used to classify readings.
    pub thresholds: Thresholds,
}

impl FormatOptions {
    pub fn new(no_color: bool, thresholds: ThresholdConfig) -> Self {
        Self {
            no_color,
            thresholds: Thresholds::new(thresholds),
            ..Self::default()
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// CSV cell for a value; empty when missing.
fn csv_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format the pH category with color
#[must_use]
pub fn format_ph_level(level: PhLevel, no_color: bool) -> String {
    let label = level.label().to_uppercase();
    if no_color {
        return format!("[{}]", label);
    }
    match level {
        PhLevel::VeryAcidic | PhLevel::Alkaline => format!("[{}]", label.red()),
        PhLevel::Acidic | PhLevel::Neutral => format!("[{}]", label.yellow()),
        PhLevel::ModeratelyAcidic => format!("[{}]", label.green()),
        PhLevel::Unknown => format!("[{}]", label.dimmed()),
    }
}

/// Format the temperature category with color
#[must_use]
pub fn format_temperature_level(level: TemperatureLevel, no_color: bool) -> String {
    let label = level.label().to_uppercase();
    if no_color {
        return format!("[{}]", label);
    }
    match level {
        TemperatureLevel::TooCold => format!("[{}]", label.blue()),
        TemperatureLevel::Ideal => format!("[{}]", label.green()),
        TemperatureLevel::TooHot => format!("[{}]", label.red()),
        TemperatureLevel::Unknown => format!("[{}]", label.dimmed()),
    }
}

// ============================================================================
// Reading formatting
// ============================================================================

#[must_use]
pub fn format_reading_text(reading: &CurrentReading, opts: &FormatOptions) -> String {
    let (temp_level, ph_level) = opts.thresholds.evaluate_reading(reading);
    let mut output = String::new();

    let name = |metric: Metric| {
        let padded = format!("{:<12}", metric.name());
        if opts.no_color {
            padded
        } else {
            padded.bold().to_string()
        }
    };

    output.push_str(&format!(
        "{} {:>10}  {}\n",
        name(Metric::Temperature),
        Metric::Temperature.format_value(reading.temperature),
        format_temperature_level(temp_level, opts.no_color)
    ));
    output.push_str(&format!(
        "{} {:>10}  {}\n",
        name(Metric::Ph),
        Metric::Ph.format_value(reading.ph),
        format_ph_level(ph_level, opts.no_color)
    ));
    output.push_str(&format!(
        "{} {:>10}\n",
        name(Metric::Ec),
        Metric::Ec.format_value(reading.ec)
    ));

    output
}

#[derive(Serialize)]
struct ReadingJson {
    temperature: f64,
    #[serde(rename = "pH")]
    ph: f64,
    ec: f64,
    temperature_status: TemperatureLevel,
    ph_status: PhLevel,
}

impl ReadingJson {
    fn new(reading: &CurrentReading, opts: &FormatOptions) -> Self {
        let (temperature_status, ph_status) = opts.thresholds.evaluate_reading(reading);
        Self {
            temperature: reading.temperature,
            ph: reading.ph,
            ec: reading.ec,
            temperature_status,
            ph_status,
        }
    }
}

pub fn format_reading_json(reading: &CurrentReading, opts: &FormatOptions) -> Result<String> {
    opts.as_json(&ReadingJson::new(reading, opts))
}

#[must_use]
pub fn format_reading_csv(reading: &CurrentReading, opts: &FormatOptions) -> String {
    let mut output = String::new();
    if !opts.no_header {
        output.push_str("temperature,ph,ec,temperature_status,ph_status\n");
    }
    let (temp_level, ph_level) = opts.thresholds.evaluate_reading(reading);
    output.push_str(&format!(
        "{},{},{},{},{}\n",
        csv_number(reading.temperature),
        csv_number(reading.ph),
        csv_number(reading.ec),
        csv_escape(temp_level.label()),
        csv_escape(ph_level.label()),
    ));
    output
}

// ============================================================================
// History formatting
// ============================================================================

/// One fetched history view.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySet {
    #[serde(serialize_with = "serialize_range")]
    pub range: HistoryRange,
    pub points: Vec<HistoryPoint>,
}

fn serialize_range<S: serde::Serializer>(range: &HistoryRange, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(range)
}

fn range_title(range: HistoryRange) -> &'static str {
    match range {
        HistoryRange::Day => "Last 24 hours",
        HistoryRange::Week => "7-day averages",
        HistoryRange::All => "All-time",
    }
}

#[must_use]
pub fn format_history_text(sets: &[HistorySet], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;
    use tabled::settings::Style;

    let mut output = String::new();
    for (i, set) in sets.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let title = format!("{} ({} points)", range_title(set.range), set.points.len());
        if opts.no_color {
            output.push_str(&title);
        } else {
            output.push_str(&title.bold().to_string());
        }
        output.push('\n');

        if set.points.is_empty() {
            output.push_str("No data available.\n");
            continue;
        }

        let mut builder = Builder::default();
        builder.push_record(["Label", "Temperature", "pH", "EC"]);
        for point in &set.points {
            builder.push_record([
                point.label.clone(),
                Metric::Temperature.format_value(point.temperature),
                Metric::Ph.format_value(point.ph),
                Metric::Ec.format_value(point.ec),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        output.push_str(&table.to_string());
        output.push('\n');
    }
    output
}

#[must_use]
pub fn format_history_csv(sets: &[HistorySet], opts: &FormatOptions) -> String {
    let mut output = String::new();
    if !opts.no_header {
        output.push_str("range,label,timestamp,temperature,ph,ec\n");
    }
    for set in sets {
        for point in &set.points {
            let timestamp = point
                .timestamp
                .and_then(|ts| ts.format(&time::format_description::well_known::Rfc3339).ok())
                .unwrap_or_default();
            output.push_str(&format!(
                "{},{},{},{},{},{}\n",
                set.range,
                csv_escape(&point.label),
                timestamp,
                csv_number(point.temperature),
                csv_number(point.ph),
                csv_number(point.ec),
            ));
        }
    }
    output
}

pub fn format_history_json(sets: &[HistorySet], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&sets)
}

// ============================================================================
// Watch formatting
// ============================================================================

/// One status line for a successful poll.
#[must_use]
pub fn format_watch_line(reading: &CurrentReading, clock: &str, opts: &FormatOptions) -> String {
    let (temp_level, ph_level) = opts.thresholds.evaluate_reading(reading);
    let ts = if opts.no_color {
        format!("[{}]", clock)
    } else {
        format!("[{}]", clock.dimmed())
    };
    format!(
        "{} T: {} {}  pH: {} {}  EC: {}\n",
        ts,
        Metric::Temperature.format_value(reading.temperature),
        format_temperature_level(temp_level, opts.no_color),
        Metric::Ph.format_value(reading.ph),
        format_ph_level(ph_level, opts.no_color),
        Metric::Ec.format_value(reading.ec),
    )
}

#[must_use]
pub fn format_watch_csv_header() -> String {
    "time,temperature,ph,ec,temperature_status,ph_status\n".to_string()
}

#[must_use]
pub fn format_watch_csv_line(reading: &CurrentReading, clock: &str, opts: &FormatOptions) -> String {
    let (temp_level, ph_level) = opts.thresholds.evaluate_reading(reading);
    format!(
        "{},{},{},{},{},{}\n",
        clock,
        csv_number(reading.temperature),
        csv_number(reading.ph),
        csv_number(reading.ec),
        temp_level.label(),
        ph_level.label(),
    )
}

// ============================================================================
// Setpoint formatting
// ============================================================================

#[must_use]
pub fn format_targets_text(values: &TargetValues) -> String {
    format!(
        "low_pH={} high_pH={} low_EC={}",
        values.low_ph, values.high_ph, values.low_ec
    )
}
