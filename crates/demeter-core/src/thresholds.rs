//! pH and temperature thresholds for the status cards.
//!
//! Readings are mapped to a discrete level by comparing against configurable
//! upper bounds. A value exactly on a bound belongs to the lower band.
//!
//! # Example
//!
//! ```
//! use demeter_core::{PhLevel, TemperatureLevel, Thresholds};
//!
//! let thresholds = Thresholds::default();
//! assert_eq!(thresholds.evaluate_ph(6.0), PhLevel::ModeratelyAcidic);
//! assert_eq!(thresholds.evaluate_temperature(17.5), TemperatureLevel::TooCold);
//! assert_eq!(thresholds.evaluate_ph(f64::NAN), PhLevel::Unknown);
//! ```

use serde::{Deserialize, Serialize};

use demeter_types::{CurrentReading, Metric};

/// pH category of the nutrient solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhLevel {
    VeryAcidic,
    Acidic,
    ModeratelyAcidic,
    Neutral,
    Alkaline,
    /// The reading is missing or not a number.
    Unknown,
}

impl PhLevel {
    /// All levels that a finite reading can map to, most acidic first.
    pub const BANDS: [PhLevel; 5] = [
        PhLevel::VeryAcidic,
        PhLevel::Acidic,
        PhLevel::ModeratelyAcidic,
        PhLevel::Neutral,
        PhLevel::Alkaline,
    ];

    /// Short label shown on the card.
    pub fn label(&self) -> &'static str {
        match self {
            PhLevel::VeryAcidic => "very acidic",
            PhLevel::Acidic => "acidic",
            PhLevel::ModeratelyAcidic => "moderately acidic",
            PhLevel::Neutral => "neutral",
            PhLevel::Alkaline => "alkaline",
            PhLevel::Unknown => "unknown",
        }
    }

    /// What the level means for the plants.
    pub fn description(&self) -> &'static str {
        match self {
            PhLevel::VeryAcidic => "Very acidic - nutrient lockout likely",
            PhLevel::Acidic => "Acidic - below the usual hydroponic range",
            PhLevel::ModeratelyAcidic => "Moderately acidic - ideal for most crops",
            PhLevel::Neutral => "Neutral - some nutrients become less available",
            PhLevel::Alkaline => "Alkaline - iron and manganese deficiency likely",
            PhLevel::Unknown => "No pH reading",
        }
    }

    /// Ordering from most acidic (4) to alkaline (0). `None` for `Unknown`.
    pub fn acidity_rank(&self) -> Option<u8> {
        match self {
            PhLevel::VeryAcidic => Some(4),
            PhLevel::Acidic => Some(3),
            PhLevel::ModeratelyAcidic => Some(2),
            PhLevel::Neutral => Some(1),
            PhLevel::Alkaline => Some(0),
            PhLevel::Unknown => None,
        }
    }
}

/// Temperature category of the nutrient solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureLevel {
    TooCold,
    Ideal,
    TooHot,
    /// The reading is missing or not a number.
    Unknown,
}

impl TemperatureLevel {
    /// Short label shown on the card.
    pub fn label(&self) -> &'static str {
        match self {
            TemperatureLevel::TooCold => "too cold",
            TemperatureLevel::Ideal => "ideal",
            TemperatureLevel::TooHot => "too hot",
            TemperatureLevel::Unknown => "unknown",
        }
    }

    /// What the level means for the plants.
    pub fn description(&self) -> &'static str {
        match self {
            TemperatureLevel::TooCold => "Too cold - root growth slows",
            TemperatureLevel::Ideal => "Ideal range",
            TemperatureLevel::TooHot => "Too hot - dissolved oxygen drops",
            TemperatureLevel::Unknown => "No temperature reading",
        }
    }
}

/// Upper bounds of the pH bands. Above `neutral_max` is alkaline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhBands {
    pub very_acidic_max: f64,
    pub acidic_max: f64,
    pub moderately_acidic_max: f64,
    pub neutral_max: f64,
}

impl Default for PhBands {
    fn default() -> Self {
        Self {
            very_acidic_max: 4.5,
            acidic_max: 5.5,
            moderately_acidic_max: 6.5,
            neutral_max: 7.5,
        }
    }
}

/// Temperature bounds in °C. Values at or below `cold_max` are too cold;
/// values at or above `hot_min` are too hot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureBands {
    pub cold_max: f64,
    pub hot_min: f64,
}

impl Default for TemperatureBands {
    fn default() -> Self {
        Self {
            cold_max: 17.5,
            hot_min: 25.5,
        }
    }
}

/// Configuration for all thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub ph: PhBands,
    pub temperature: TemperatureBands,
}

/// Threshold evaluator for sensor readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thresholds {
    config: ThresholdConfig,
}

impl Thresholds {
    /// Create a new threshold evaluator with the given configuration.
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Evaluate a pH value.
    pub fn evaluate_ph(&self, ph: f64) -> PhLevel {
        let bands = &self.config.ph;
        if !ph.is_finite() {
            PhLevel::Unknown
        } else if ph <= bands.very_acidic_max {
            PhLevel::VeryAcidic
        } else if ph <= bands.acidic_max {
            PhLevel::Acidic
        } else if ph <= bands.moderately_acidic_max {
            PhLevel::ModeratelyAcidic
        } else if ph <= bands.neutral_max {
            PhLevel::Neutral
        } else {
            PhLevel::Alkaline
        }
    }

    /// Evaluate a temperature in °C.
    pub fn evaluate_temperature(&self, celsius: f64) -> TemperatureLevel {
        let bands = &self.config.temperature;
        if !celsius.is_finite() {
            TemperatureLevel::Unknown
        } else if celsius <= bands.cold_max {
            TemperatureLevel::TooCold
        } else if celsius >= bands.hot_min {
            TemperatureLevel::TooHot
        } else {
            TemperatureLevel::Ideal
        }
    }

    /// Evaluate both classified metrics of a reading.
    pub fn evaluate_reading(&self, reading: &CurrentReading) -> (TemperatureLevel, PhLevel) {
        (
            self.evaluate_temperature(reading.value(Metric::Temperature)),
            self.evaluate_ph(reading.value(Metric::Ph)),
        )
    }
}

/// Classify a pH value with the default bands.
pub fn classify_ph(ph: f64) -> PhLevel {
    Thresholds::default().evaluate_ph(ph)
}

/// Classify a temperature with the default bands.
pub fn classify_temperature(celsius: f64) -> TemperatureLevel {
    Thresholds::default().evaluate_temperature(celsius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ph_bands() {
        assert_eq!(classify_ph(3.0), PhLevel::VeryAcidic);
        assert_eq!(classify_ph(5.0), PhLevel::Acidic);
        assert_eq!(classify_ph(6.0), PhLevel::ModeratelyAcidic);
        assert_eq!(classify_ph(7.0), PhLevel::Neutral);
        assert_eq!(classify_ph(8.2), PhLevel::Alkaline);
    }

    #[test]
    fn test_ph_boundary_values() {
        assert_eq!(classify_ph(4.5), PhLevel::VeryAcidic);
        assert_eq!(classify_ph(5.5), PhLevel::Acidic);
        assert_eq!(classify_ph(6.5), PhLevel::ModeratelyAcidic);
        assert_eq!(classify_ph(7.5), PhLevel::Neutral);
        assert_eq!(classify_ph(7.500001), PhLevel::Alkaline);
    }

    #[test]
    fn test_ph_non_numeric() {
        assert_eq!(classify_ph(f64::NAN), PhLevel::Unknown);
        assert_eq!(classify_ph(f64::INFINITY), PhLevel::Unknown);
        assert_eq!(classify_ph(f64::NEG_INFINITY), PhLevel::Unknown);
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(classify_temperature(17.5), TemperatureLevel::TooCold);
        assert_eq!(classify_temperature(25.5), TemperatureLevel::TooHot);
        assert_eq!(classify_temperature(17.51), TemperatureLevel::Ideal);
        assert_eq!(classify_temperature(25.49), TemperatureLevel::Ideal);
        assert_eq!(classify_temperature(-3.0), TemperatureLevel::TooCold);
        assert_eq!(classify_temperature(40.0), TemperatureLevel::TooHot);
        assert_eq!(classify_temperature(f64::NAN), TemperatureLevel::Unknown);
    }

    #[test]
    fn test_custom_bands() {
        let t = Thresholds::new(ThresholdConfig {
            ph: PhBands {
                moderately_acidic_max: 6.2,
                ..PhBands::default()
            },
            temperature: TemperatureBands {
                cold_max: 15.0,
                hot_min: 28.0,
            },
        });
        assert_eq!(t.evaluate_ph(6.3), PhLevel::Neutral);
        assert_eq!(t.evaluate_temperature(16.0), TemperatureLevel::Ideal);
        assert_eq!(t.evaluate_temperature(27.0), TemperatureLevel::Ideal);
    }

    #[test]
    fn test_evaluate_reading() {
        let reading = CurrentReading {
            temperature: 26.0,
            ph: 5.2,
            ec: 1.1,
        };
        let (temp, ph) = Thresholds::default().evaluate_reading(&reading);
        assert_eq!(temp, TemperatureLevel::TooHot);
        assert_eq!(ph, PhLevel::Acidic);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: ThresholdConfig =
            serde_json::from_str(r#"{"temperature": {"hot_min": 27.0}}"#).unwrap();
        assert_eq!(config.temperature.hot_min, 27.0);
        assert_eq!(config.temperature.cold_max, 17.5);
        assert_eq!(config.ph, PhBands::default());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(PhLevel::ModeratelyAcidic.label(), "moderately acidic");
        assert_eq!(TemperatureLevel::TooHot.label(), "too hot");
        assert!(PhLevel::Alkaline.description().contains("Alkaline"));
        assert_eq!(PhLevel::Unknown.acidity_rank(), None);
    }
}
