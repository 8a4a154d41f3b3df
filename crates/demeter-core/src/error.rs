//! Error types for demeter-core.
//!
//! Every fetch against the backend can fail the same handful of ways:
//!
//! | Error | Cause | Dashboard effect |
//! |-------|-------|------------------|
//! | [`Error::NotReachable`] | Connection refused, DNS, timeout | Connectivity lost |
//! | [`Error::Api`] | Non-2xx status | Connectivity lost |
//! | [`Error::Decode`] | Body is not the expected JSON | Connectivity lost |
//! | [`Error::InvalidSetpoint`] | Form field failed validation | Submit disabled |
//!
//! None of these are fatal. The poller logs them and the next scheduled
//! poll is the retry.

use thiserror::Error;

use crate::setpoint::SetpointError;

/// Errors that can occur when talking to the Demeter backend.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured backend URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The backend could not be reached.
    #[error("Backend not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request was sent but the response could not be read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON shape the endpoint returns.
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A backend double was told to fail.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Setpoint form input was rejected before sending.
    #[error(transparent)]
    InvalidSetpoint(#[from] SetpointError),
}

impl Error {
    /// Returns true for failures that happened before any HTTP status was
    /// received (the request never completed).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::NotReachable { .. } | Error::Request(_) | Error::Unavailable(_)
        )
    }

    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias using demeter-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 404,
            message: "No data available".to_string(),
        };
        assert_eq!(err.to_string(), "API error (404): No data available");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_decode_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = Error::Decode {
            url: "http://localhost:5000/api/sensor".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Malformed response from http://localhost:5000/api/sensor"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unavailable_is_transport() {
        assert!(Error::Unavailable("down".into()).is_transport());
        assert!(!Error::Api { status: 500, message: String::new() }.is_transport());
    }

    #[test]
    fn test_invalid_setpoint_is_transparent() {
        let err: Error = SetpointError::Blank(crate::setpoint::SetpointField::LowPh).into();
        assert_eq!(err.to_string(), SetpointError::Blank(crate::setpoint::SetpointField::LowPh).to_string());
    }
}
