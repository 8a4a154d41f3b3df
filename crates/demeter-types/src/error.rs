//! Error types for data parsing in demeter-types.

use thiserror::Error;

/// Errors that can occur when interpreting Demeter sensor data.
///
/// This error type is transport-agnostic and does not include
/// HTTP errors (those belong in demeter-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The metric name is not one of temperature, pH, or EC.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}
