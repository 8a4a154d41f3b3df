//! Mock backend implementation for testing.
//!
//! The [`MockBackend`] implements the [`SensorBackend`] trait, so the poller
//! and the setpoint form can be driven without a device on the network.
//!
//! # Features
//!
//! - **Failure injection**: fail every request, the next N requests, or only
//!   a specific history range
//! - **Latency simulation**: delay each request to exercise cancellation
//! - **Setpoint capture**: record every submitted body, optionally rejecting
//!   it with an HTTP status

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use demeter_types::{CurrentReading, HistoryPoint, TargetValues};

use crate::client::HistoryRange;
use crate::error::{Error, Result};
use crate::traits::SensorBackend;

/// A mock Demeter backend for testing.
///
/// # Example
///
/// ```
/// use demeter_core::{MockBackend, SensorBackend};
///
/// #[tokio::main]
/// async fn main() {
///     let backend = MockBackend::builder().temperature(21.5).ph(6.1).build();
///     let reading = backend.current_reading().await.unwrap();
///     assert_eq!(reading.temperature, 21.5);
/// }
/// ```
pub struct MockBackend {
    reading: RwLock<CurrentReading>,
    history: RwLock<HashMap<HistoryRange, Vec<HistoryPoint>>>,
    failing_ranges: RwLock<HashSet<HistoryRange>>,
    submissions: RwLock<Vec<TargetValues>>,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Status returned for setpoint submissions (0 = accept).
    reject_status: AtomicU16,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    /// Requests left to fail before succeeding again.
    remaining_failures: AtomicU32,
    read_count: AtomicU32,
    history_count: AtomicU32,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .field("read_count", &self.read_count.load(Ordering::Relaxed))
            .field("history_count", &self.history_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a backend that reports a plausible steady reading and no history.
    pub fn new() -> Self {
        Self {
            reading: RwLock::new(Self::default_reading()),
            history: RwLock::new(HashMap::new()),
            failing_ranges: RwLock::new(HashSet::new()),
            submissions: RwLock::new(Vec::new()),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            reject_status: AtomicU16::new(0),
            latency_ms: AtomicU64::new(0),
            remaining_failures: AtomicU32::new(0),
            read_count: AtomicU32::new(0),
            history_count: AtomicU32::new(0),
        }
    }

    /// Start building a mock with custom values.
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::new()
    }

    fn default_reading() -> CurrentReading {
        CurrentReading {
            temperature: 22.0,
            ph: 6.0,
            ec: 1.4,
        }
    }

    async fn check_should_fail(&self) -> Result<()> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::Unavailable(self.fail_message.read().await.clone()));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(Error::Unavailable(self.fail_message.read().await.clone()))
        } else {
            Ok(())
        }
    }

    // --- Test control methods ---

    /// Set the reading returned by subsequent polls.
    pub async fn set_reading(&self, reading: CurrentReading) {
        *self.reading.write().await = reading;
    }

    /// Replace the records served for a history range.
    pub async fn set_history(&self, range: HistoryRange, points: Vec<HistoryPoint>) {
        self.history.write().await.insert(range, points);
    }

    /// Make a single history range fail while everything else keeps working.
    pub async fn fail_history(&self, range: HistoryRange, fail: bool) {
        let mut ranges = self.failing_ranges.write().await;
        if fail {
            ranges.insert(range);
        } else {
            ranges.remove(&range);
        }
    }

    /// Make every request fail until cleared.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` requests, then succeed.
    pub fn set_transient_failures(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Answer setpoint submissions with this HTTP status instead of accepting them.
    ///
    /// Pass `None` to go back to accepting.
    pub fn set_reject_status(&self, status: Option<u16>) {
        self.reject_status.store(status.unwrap_or(0), Ordering::Relaxed);
    }

    /// Set simulated latency for every request.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of current-reading requests served or failed.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Number of history requests served or failed.
    pub fn history_count(&self) -> u32 {
        self.history_count.load(Ordering::Relaxed)
    }

    /// Setpoint bodies received so far, oldest first.
    pub async fn submissions(&self) -> Vec<TargetValues> {
        self.submissions.read().await.clone()
    }
}

#[async_trait]
impl SensorBackend for MockBackend {
    async fn current_reading(&self) -> Result<CurrentReading> {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        self.check_should_fail().await?;
        Ok(*self.reading.read().await)
    }

    async fn history(&self, range: HistoryRange) -> Result<Vec<HistoryPoint>> {
        self.history_count.fetch_add(1, Ordering::Relaxed);
        self.check_should_fail().await?;

        if self.failing_ranges.read().await.contains(&range) {
            return Err(Error::Api {
                status: 404,
                message: "No data available".to_string(),
            });
        }

        Ok(self
            .history
            .read()
            .await
            .get(&range)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_target_values(&self, values: &TargetValues) -> Result<()> {
        self.check_should_fail().await?;
        self.submissions.write().await.push(*values);

        match self.reject_status.load(Ordering::Relaxed) {
            0 => Ok(()),
            status => Err(Error::Api {
                status,
                message: "Rejected by mock".to_string(),
            }),
        }
    }
}

/// Builder for creating mock backends with custom settings.
#[derive(Debug, Clone)]
pub struct MockBackendBuilder {
    reading: CurrentReading,
    history: HashMap<HistoryRange, Vec<HistoryPoint>>,
    should_fail: bool,
    latency: Duration,
}

impl Default for MockBackendBuilder {
    fn default() -> Self {
        Self {
            reading: MockBackend::default_reading(),
            history: HashMap::new(),
            should_fail: false,
            latency: Duration::ZERO,
        }
    }
}

impl MockBackendBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.reading.temperature = temperature;
        self
    }

    /// Set the pH.
    pub fn ph(mut self, ph: f64) -> Self {
        self.reading.ph = ph;
        self
    }

    /// Set the EC.
    pub fn ec(mut self, ec: f64) -> Self {
        self.reading.ec = ec;
        self
    }

    /// Serve these points for a history range.
    pub fn history(mut self, range: HistoryRange, points: Vec<HistoryPoint>) -> Self {
        self.history.insert(range, points);
        self
    }

    /// Start in the failing state.
    pub fn failing(mut self, fail: bool) -> Self {
        self.should_fail = fail;
        self
    }

    /// Delay every request.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Build the mock backend.
    pub fn build(self) -> MockBackend {
        MockBackend {
            reading: RwLock::new(self.reading),
            history: RwLock::new(self.history),
            should_fail: AtomicBool::new(self.should_fail),
            latency_ms: AtomicU64::new(self.latency.as_millis() as u64),
            ..MockBackend::new()
        }
    }
}

/// Build a history point with a day label, for tests and demos.
pub fn sample_point(label: &str, temperature: f64, ph: f64, ec: f64) -> HistoryPoint {
    HistoryPoint {
        label: label.to_string(),
        timestamp: None,
        temperature,
        ph,
        ec,
    }
}
