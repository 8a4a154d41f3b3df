//! Core types for Demeter sensor data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseError;

/// A sensor channel reported by the Demeter device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Nutrient solution temperature in °C.
    Temperature,
    /// Acidity/alkalinity of the nutrient solution.
    #[cfg_attr(feature = "serde", serde(rename = "pH"))]
    Ph,
    /// Electrical conductivity, a proxy for dissolved nutrients.
    Ec,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Ph, Metric::Ec];

    /// Short key used for series names and CLI arguments.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temp",
            Metric::Ph => "pH",
            Metric::Ec => "ec",
        }
    }

    /// Human-readable name used on cards.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Ph => "pH Level",
            Metric::Ec => "EC Level",
        }
    }

    /// Axis/legend label including the unit.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Ph => "pH Level",
            Metric::Ec => "EC (mS/cm)",
        }
    }

    /// Unit suffix, empty for pH.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Ph => "",
            Metric::Ec => "mS/cm",
        }
    }

    /// Display text for a value of this metric, `--` when missing.
    #[must_use]
    pub fn format_value(self, value: f64) -> String {
        if !value.is_finite() {
            return "--".to_string();
        }
        match self {
            Metric::Temperature => format!("{:.1} {}", value, self.unit()),
            Metric::Ph => format!("{:.2}", value),
            Metric::Ec => format!("{:.2} {}", value, self.unit()),
        }
    }

    /// Series color as an RGB triple.
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Metric::Temperature => (0xff, 0x73, 0x00),
            Metric::Ph => (0x38, 0x79, 0x08),
            Metric::Ec => (0x88, 0x84, 0xd8),
        }
    }

    /// The next metric in display order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Metric::Temperature => Metric::Ph,
            Metric::Ph => Metric::Ec,
            Metric::Ec => Metric::Temperature,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    /// Parse a metric name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use demeter_types::Metric;
    ///
    /// assert_eq!("temp".parse::<Metric>(), Ok(Metric::Temperature));
    /// assert_eq!("PH".parse::<Metric>(), Ok(Metric::Ph));
    /// assert_eq!("ec".parse::<Metric>(), Ok(Metric::Ec));
    /// assert!("humidity".parse::<Metric>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temp" | "temperature" => Ok(Metric::Temperature),
            "ph" => Ok(Metric::Ph),
            "ec" | "conductivity" => Ok(Metric::Ec),
            other => Err(ParseError::UnknownMetric(other.to_string())),
        }
    }
}

/// The latest reading from the device.
///
/// Missing or non-numeric fields in the backend payload are represented
/// as `f64::NAN` rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentReading {
    /// Temperature in °C.
    pub temperature: f64,
    /// pH value (resolved through [`resolve_ph`]).
    #[cfg_attr(feature = "serde", serde(rename = "pH"))]
    pub ph: f64,
    /// Electrical conductivity.
    pub ec: f64,
}

impl CurrentReading {
    /// Get the value of a single metric.
    #[must_use]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Ph => self.ph,
            Metric::Ec => self.ec,
        }
    }

    /// Returns true if any metric is a placeholder (non-finite).
    #[must_use]
    pub fn has_missing(&self) -> bool {
        Metric::ALL.iter().any(|&m| !self.value(m).is_finite())
    }
}

/// One point of a historical series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryPoint {
    /// Axis label: a date, a formatted timestamp, or a day number.
    pub label: String,
    /// When the sample was taken, if the backend reported a parseable time.
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "time::serde::rfc3339::option")
    )]
    pub timestamp: Option<OffsetDateTime>,
    /// Temperature in °C.
    pub temperature: f64,
    /// pH value.
    #[cfg_attr(feature = "serde", serde(rename = "pH"))]
    pub ph: f64,
    /// Electrical conductivity.
    pub ec: f64,
}

impl HistoryPoint {
    /// Get the value of a single metric.
    #[must_use]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Ph => self.ph,
            Metric::Ec => self.ec,
        }
    }
}

/// Target values pushed to the device's dosing logic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetValues {
    /// Below this pH the device doses pH-up solution.
    #[cfg_attr(feature = "serde", serde(rename = "low_pH"))]
    pub low_ph: f64,
    /// Above this pH the device doses pH-down solution.
    #[cfg_attr(feature = "serde", serde(rename = "high_pH"))]
    pub high_ph: f64,
    /// Below this EC the device doses nutrients.
    #[cfg_attr(feature = "serde", serde(rename = "low_EC"))]
    pub low_ec: f64,
}

impl Default for TargetValues {
    /// The values the device falls back to when none were ever set.
    fn default() -> Self {
        Self {
            low_ph: 5.5,
            high_ph: 6.4,
            low_ec: 1000.0,
        }
    }
}

/// Resolve the pH value from the two fields the backend may report.
///
/// The primary field wins when it is present and non-zero; otherwise the
/// alternate source is used. When neither is available the result is NaN.
///
/// # Examples
///
/// ```
/// use demeter_types::resolve_ph;
///
/// assert_eq!(resolve_ph(Some(6.8), Some(6.2)), 6.8);
/// assert_eq!(resolve_ph(Some(0.0), Some(6.2)), 6.2);
/// assert_eq!(resolve_ph(None, Some(6.2)), 6.2);
/// assert!(resolve_ph(None, None).is_nan());
/// ```
#[must_use]
pub fn resolve_ph(primary: Option<f64>, alternate: Option<f64>) -> f64 {
    match primary {
        Some(value) if value != 0.0 => value,
        _ => alternate.unwrap_or(f64::NAN),
    }
}
