//! Schema for the loosely typed JSON the Demeter backend returns.
//!
//! The backend builds its responses from whatever sensors answered on the
//! I²C bus, so every field is optional, values may arrive as numbers,
//! numeric strings, or `null`, and pH can be reported under either `pH` or
//! the opaque alternate key `"99"`. [`RawReading`] accepts all of that
//! without failing; conversion to the typed model substitutes NaN for
//! anything missing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::types::{CurrentReading, HistoryPoint, resolve_ph};

/// A single record as reported by `/api/sensor` or one of the history endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReading {
    #[serde(rename = "Temperature", default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(rename = "EC", default, deserialize_with = "lenient_number")]
    pub ec: Option<f64>,
    #[serde(rename = "pH", default, deserialize_with = "lenient_number")]
    pub ph: Option<f64>,
    /// Alternate pH source. The key has no documented meaning beyond that.
    #[serde(rename = "99", default, deserialize_with = "lenient_number")]
    pub alt_ph: Option<f64>,
    /// ISO-8601 sample time (all-time and 24h endpoints).
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    /// Calendar day (7-day average endpoint).
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

impl RawReading {
    /// Interpret an arbitrary JSON value as a record.
    ///
    /// Values that are not objects yield an empty record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }

    /// The pH after applying the primary/alternate fallback rule.
    #[must_use]
    pub fn resolved_ph(&self) -> f64 {
        resolve_ph(self.ph, self.alt_ph)
    }

    /// Convert to the current-reading shape.
    #[must_use]
    pub fn to_reading(&self) -> CurrentReading {
        CurrentReading {
            temperature: self.temperature.unwrap_or(f64::NAN),
            ph: self.resolved_ph(),
            ec: self.ec.unwrap_or(f64::NAN),
        }
    }

    /// Convert to a history point. `index` is the record's position in its
    /// series and only matters when the record carries no date or time.
    #[must_use]
    pub fn to_history_point(&self, index: usize) -> HistoryPoint {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.date.as_deref().and_then(parse_date));

        let label = if let Some(date) = &self.date {
            date.clone()
        } else if let Some(ts) = timestamp {
            format_label(ts)
        } else if let Some(raw) = &self.timestamp {
            raw.clone()
        } else {
            format!("Day {}", index + 1)
        };

        HistoryPoint {
            label,
            timestamp,
            temperature: self.temperature.unwrap_or(f64::NAN),
            ph: self.resolved_ph(),
            ec: self.ec.unwrap_or(f64::NAN),
        }
    }
}

/// Map backend records to history points, preserving their order.
///
/// Records that are not objects become all-placeholder points.
#[must_use]
pub fn history_from_records(records: &[Value]) -> Vec<HistoryPoint> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| RawReading::from_value(record).to_history_point(i))
        .collect()
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (`2025-03-01T12:30:00.123456`, as
/// produced by Python's `isoformat()`), the latter interpreted as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }

    let head = raw.get(..19)?.replacen(' ', "T", 1);
    PrimitiveDateTime::parse(
        &head,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}

fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// Format a timestamp for an axis label.
#[must_use]
pub fn format_label(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_else(|_| ts.to_string())
}

/// Interpret a JSON value as a finite number, if possible.
#[must_use]
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_reading_with_primary_ph() {
        let raw: RawReading =
            serde_json::from_value(json!({"Temperature": 22.4, "EC": 1.8, "pH": 6.8, "99": 6.2}))
                .unwrap();
        let reading = raw.to_reading();
        assert_eq!(reading.temperature, 22.4);
        assert_eq!(reading.ec, 1.8);
        assert_eq!(reading.ph, 6.8);
    }

    #[test]
    fn test_reading_falls_back_to_alternate_ph() {
        let raw: RawReading =
            serde_json::from_value(json!({"Temperature": 22.4, "EC": 1.8, "pH": 0, "99": 6.2}))
                .unwrap();
        assert_eq!(raw.to_reading().ph, 6.2);

        let raw: RawReading =
            serde_json::from_value(json!({"Temperature": 22.4, "EC": 1.8, "99": 6.2})).unwrap();
        assert_eq!(raw.to_reading().ph, 6.2);
    }

    #[test]
    fn test_numeric_strings_and_nulls() {
        let raw: RawReading = serde_json::from_value(
            json!({"Temperature": "25.043", "EC": null, "pH": "not a number"}),
        )
        .unwrap();
        let reading = raw.to_reading();
        assert_eq!(reading.temperature, 25.043);
        assert!(reading.ec.is_nan());
        assert!(reading.ph.is_nan());
    }

    #[test]
    fn test_empty_object_yields_placeholders() {
        let raw: RawReading = serde_json::from_value(json!({})).unwrap();
        let reading = raw.to_reading();
        assert!(reading.temperature.is_nan());
        assert!(reading.ph.is_nan());
        assert!(reading.ec.is_nan());
    }

    #[test]
    fn test_from_value_non_object() {
        assert_eq!(RawReading::from_value(&json!(null)), RawReading::default());
        assert_eq!(RawReading::from_value(&json!([1, 2])), RawReading::default());
        assert_eq!(RawReading::from_value(&json!(21.5)), RawReading::default());
    }

    #[test]
    fn test_array_record_is_not_a_data_point() {
        let records = vec![json!([21.0, 1.5, 6.1]), json!({"Temperature": 20.5})];
        let points = history_from_records(&records);
        assert!(points[0].temperature.is_nan());
        assert!(points[0].ec.is_nan());
        assert!(points[0].ph.is_nan());
        assert_eq!(points[0].label, "Day 1");
        assert_eq!(points[1].temperature, 20.5);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw: RawReading =
            serde_json::from_value(json!({"Temperature": 20.0, "Pump_pH_low": 1})).unwrap();
        assert_eq!(raw.temperature, Some(20.0));
    }

    #[test]
    fn test_weekly_history_labels_use_date() {
        let records = vec![
            json!({"date": "2025-03-01", "Temperature": 21.0, "EC": 1.5, "pH": 6.1}),
            json!({"date": "2025-03-02", "Temperature": 22.0, "EC": 1.6, "99": 6.3}),
        ];
        let points = history_from_records(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "2025-03-01");
        assert_eq!(points[1].ph, 6.3);
        assert!(points[0].timestamp.is_some());
    }

    #[test]
    fn test_history_record_missing_fields_does_not_fail() {
        let records = vec![json!({"date": "2025-03-01"}), json!(null), json!({"Temperature": 20.5})];
        let points = history_from_records(&records);
        assert_eq!(points.len(), 3);
        assert!(points[0].temperature.is_nan());
        assert_eq!(points[1].label, "Day 2");
        assert_eq!(points[2].temperature, 20.5);
    }

    #[test]
    fn test_history_from_no_records() {
        assert!(history_from_records(&[]).is_empty());
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2025-03-01T12:30:00Z").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_timestamp_naive_isoformat() {
        let ts = parse_timestamp("2025-03-01T12:30:00.123456").unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.offset(), time::UtcOffset::UTC);

        assert!(parse_timestamp("2025-03-01 08:15:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_all_time_labels_formatted() {
        let records = vec![
            json!({"timestamp": "2025-03-01T12:30:00.5", "Temperature": 21.0, "EC": 1.5, "pH": 6.1}),
            json!({"timestamp": "garbled", "Temperature": 21.5}),
        ];
        let points = history_from_records(&records);
        assert_eq!(points[0].label, "2025-03-01 12:30");
        assert_eq!(points[1].label, "garbled");
        assert!(points[1].timestamp.is_none());
    }
}
