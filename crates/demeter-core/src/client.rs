//! HTTP client for the Demeter backend REST API.
//!
//! The backend runs on the device controller (a Raspberry Pi) and exposes
//! the latest sensor reading, a few history views, and an endpoint that
//! accepts new dosing setpoints.
//!
//! # Example
//!
//! ```no_run
//! use demeter_core::{DemeterClient, HistoryRange};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DemeterClient::new("http://raspberrypi.local:5000")?;
//!
//! let reading = client.current_reading().await?;
//! println!("pH: {:.2}", reading.ph);
//!
//! let week = client.history(HistoryRange::Week).await?;
//! println!("{} daily averages", week.len());
//! # Ok(())
//! # }
//! ```

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::Error as _;
use serde_json::{Map, Value};
use tracing::debug;

use demeter_types::{CurrentReading, HistoryPoint, RawReading, TargetValues, history_from_records};

use crate::error::{Error, Result};

/// Backend URL used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Per-request timeout used by [`DemeterClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which history view to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HistoryRange {
    /// Raw samples from the last 24 hours.
    Day,
    /// One averaged point per day for the last 7 days.
    #[default]
    Week,
    /// Every stored sample, oldest first.
    All,
}

impl HistoryRange {
    /// API path for this range.
    pub fn path(self) -> &'static str {
        match self {
            HistoryRange::Day => "/api/history/24h",
            HistoryRange::Week => "/api/history/7d_avg",
            HistoryRange::All => "/api/history/all",
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryRange::Day => "24h",
            HistoryRange::Week => "7d",
            HistoryRange::All => "all",
        })
    }
}

impl FromStr for HistoryRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" | "day" => Ok(HistoryRange::Day),
            "7d" | "7d_avg" | "week" => Ok(HistoryRange::Week),
            "all" => Ok(HistoryRange::All),
            other => Err(format!("unknown history range '{other}' (expected 24h, 7d, or all)")),
        }
    }
}

/// HTTP client for the Demeter backend.
#[derive(Debug, Clone)]
pub struct DemeterClient {
    client: Client,
    base_url: String,
}

impl DemeterClient {
    /// Create a new client with the default request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The backend root (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Request)?;
        Self::with_client(base_url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest sensor reading.
    ///
    /// The body must be a JSON object; individual fields are read leniently
    /// and anything missing becomes a NaN placeholder.
    pub async fn current_reading(&self) -> Result<CurrentReading> {
        let url = format!("{}/api/sensor", self.base_url);
        let object: Map<String, Value> = self.get_json(&url).await?;
        Ok(RawReading::from_value(&Value::Object(object)).to_reading())
    }

    /// Fetch one of the history views.
    pub async fn history(&self, range: HistoryRange) -> Result<Vec<HistoryPoint>> {
        let url = format!("{}{}", self.base_url, range.path());
        let records: Vec<Value> = self.get_json(&url).await?;
        debug!(%range, records = records.len(), "Fetched history");
        Ok(history_from_records(&records))
    }

    /// Send new target values to the device.
    ///
    /// Any 2xx status counts as accepted; the response body is ignored.
    pub async fn set_target_values(&self, values: &TargetValues) -> Result<()> {
        let url = format!("{}/api/set-target-values", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(values)
            .send()
            .await
            .map_err(|e| Error::NotReachable {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(api_error(status.as_u16(), &response.text().await.unwrap_or_default()))
        }
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::NotReachable {
                url: url.to_string(),
                source: e,
            })?;

        self.handle_response(url, response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Error::Request)?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Err(Error::Decode {
                url: url.to_string(),
                source: serde_json::Error::custom("empty response body"),
            });
        }

        serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

/// Build an API error, preferring the backend's `{"error": "..."}` message.
fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .map(|s| s.to_string())
                .unwrap_or_else(|_| status.to_string())
        });

    Error::Api { status, message }
}
