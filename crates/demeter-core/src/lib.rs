//! Client library for the Demeter hydroponics backend.
//!
//! This crate talks to the HTTP API exposed by the Demeter device controller
//! and keeps a dashboard's view of it up to date.
//!
//! # Features
//!
//! - **HTTP client**: current reading, 24-hour / 7-day / all-time history,
//!   setpoint updates
//! - **Polling controller**: a cancellable background task that polls on a
//!   fixed cadence and reports results as events
//! - **Dashboard state**: an explicit state container updated only through
//!   [`DashboardState::apply`]
//! - **Status thresholds**: pH and temperature classification for the cards
//! - **Setpoint form**: validation and one-shot submission of dosing targets
//! - **Mock backend**: failure and latency injection for tests
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use demeter_core::{DashboardState, DemeterClient, PollerConfig, poller};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DemeterClient::new("http://localhost:5000")?);
//!     let (handle, mut events) = poller::spawn(client, PollerConfig::default());
//!
//!     let mut state = DashboardState::default();
//!     while let Some(event) = events.recv().await {
//!         state.apply(event);
//!         println!("connected: {}", state.is_connected());
//!     }
//!
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod mock;
pub mod poller;
pub mod setpoint;
pub mod state;
pub mod thresholds;
pub mod traits;
pub mod window;

pub use client::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT, DemeterClient, HistoryRange};
pub use error::{Error, Result};
pub use messages::{Command, DashboardEvent};
pub use mock::{MockBackend, MockBackendBuilder};
pub use poller::{DEFAULT_POLL_INTERVAL, PollerConfig, PollerHandle};
pub use setpoint::{SetpointError, SetpointField, SetpointForm, SetpointOutcome, VALIDATION_MESSAGE};
pub use state::{AllTimeState, DashboardState};
pub use thresholds::{
    PhBands, PhLevel, TemperatureBands, TemperatureLevel, ThresholdConfig, Thresholds,
    classify_ph, classify_temperature,
};
pub use traits::SensorBackend;
pub use window::{DEFAULT_HISTORY_CAPACITY, HistoryWindow, series_of};

// Re-export from demeter-types
pub use demeter_types::{CurrentReading, HistoryPoint, Metric, TargetValues};
