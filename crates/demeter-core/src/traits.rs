//! Trait abstraction over the Demeter backend.
//!
//! The [`SensorBackend`] trait is implemented by the real HTTP client and by
//! [`crate::MockBackend`], so the poller and the setpoint form can be tested
//! without a device on the network.

use async_trait::async_trait;

use demeter_types::{CurrentReading, HistoryPoint, TargetValues};

use crate::client::{DemeterClient, HistoryRange};
use crate::error::Result;

/// Operations the dashboard needs from a backend.
///
/// # Example
///
/// ```ignore
/// use demeter_core::{SensorBackend, Result};
///
/// async fn print_reading<B: SensorBackend>(backend: &B) -> Result<()> {
///     let reading = backend.current_reading().await?;
///     println!("EC: {}", reading.ec);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SensorBackend: Send + Sync {
    /// Fetch the latest reading.
    async fn current_reading(&self) -> Result<CurrentReading>;

    /// Fetch a history view.
    async fn history(&self, range: HistoryRange) -> Result<Vec<HistoryPoint>>;

    /// Push new dosing setpoints to the device.
    async fn set_target_values(&self, values: &TargetValues) -> Result<()>;
}

#[async_trait]
impl SensorBackend for DemeterClient {
    async fn current_reading(&self) -> Result<CurrentReading> {
        DemeterClient::current_reading(self).await
    }

    async fn history(&self, range: HistoryRange) -> Result<Vec<HistoryPoint>> {
        DemeterClient::history(self, range).await
    }

    async fn set_target_values(&self, values: &TargetValues) -> Result<()> {
        DemeterClient::set_target_values(self, values).await
    }
}
