//! Setpoint form: validation and submission of dosing targets.
//!
//! The form holds raw text for three fields. It can be submitted only when
//! every field is non-blank and parses as a finite number. Submission is a
//! single request with no retry and no read-back; the caller gets a
//! [`SetpointOutcome`] to show the user.

use core::fmt;

use thiserror::Error;
use tracing::{info, warn};

use demeter_types::TargetValues;

use crate::error::{Error, Result};
use crate::traits::SensorBackend;

/// Message shown while the form cannot be submitted.
pub const VALIDATION_MESSAGE: &str = "Please enter valid numbers for all fields.";

/// One input of the setpoint form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetpointField {
    LowPh,
    HighPh,
    /// Maximum nutrient concentration; sent as the backend's `low_EC`.
    EcHigh,
}

impl SetpointField {
    /// Fields in form order.
    pub const ALL: [SetpointField; 3] = [
        SetpointField::LowPh,
        SetpointField::HighPh,
        SetpointField::EcHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SetpointField::LowPh => "pH Low",
            SetpointField::HighPh => "pH High",
            SetpointField::EcHigh => "EC High (max nutrient conc.)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SetpointField::LowPh => "Recommended: 5.5",
            SetpointField::HighPh => "Recommended: 6.4",
            SetpointField::EcHigh => "Recommended: 1800",
        }
    }

    /// The next field, wrapping around.
    pub fn next(self) -> Self {
        match self {
            SetpointField::LowPh => SetpointField::HighPh,
            SetpointField::HighPh => SetpointField::EcHigh,
            SetpointField::EcHigh => SetpointField::LowPh,
        }
    }

    /// The previous field, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            SetpointField::LowPh => SetpointField::EcHigh,
            SetpointField::HighPh => SetpointField::LowPh,
            SetpointField::EcHigh => SetpointField::HighPh,
        }
    }
}

impl fmt::Display for SetpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a form field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetpointError {
    #[error("{0} is required")]
    Blank(SetpointField),

    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: SetpointField, input: String },
}

impl SetpointError {
    pub fn field(&self) -> SetpointField {
        match self {
            SetpointError::Blank(field) | SetpointError::NotANumber { field, .. } => *field,
        }
    }
}

/// Raw text of the three setpoint inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetpointForm {
    pub ph_low: String,
    pub ph_high: String,
    pub ec_high: String,
}

impl SetpointForm {
    pub fn new(ph_low: &str, ph_high: &str, ec_high: &str) -> Self {
        Self {
            ph_low: ph_low.to_string(),
            ph_high: ph_high.to_string(),
            ec_high: ec_high.to_string(),
        }
    }

    pub fn field(&self, field: SetpointField) -> &str {
        match field {
            SetpointField::LowPh => &self.ph_low,
            SetpointField::HighPh => &self.ph_high,
            SetpointField::EcHigh => &self.ec_high,
        }
    }

    pub fn field_mut(&mut self, field: SetpointField) -> &mut String {
        match field {
            SetpointField::LowPh => &mut self.ph_low,
            SetpointField::HighPh => &mut self.ph_high,
            SetpointField::EcHigh => &mut self.ec_high,
        }
    }

    /// Parse all three fields into the request body.
    ///
    /// Reports the first invalid field in form order.
    pub fn validate(&self) -> std::result::Result<TargetValues, SetpointError> {
        Ok(TargetValues {
            low_ph: parse_field(SetpointField::LowPh, &self.ph_low)?,
            high_ph: parse_field(SetpointField::HighPh, &self.ph_high)?,
            low_ec: parse_field(SetpointField::EcHigh, &self.ec_high)?,
        })
    }

    /// Whether the submit action is enabled.
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    /// The message to show next to the disabled submit action, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        (!self.is_submittable()).then_some(VALIDATION_MESSAGE)
    }
}

fn parse_field(field: SetpointField, raw: &str) -> std::result::Result<f64, SetpointError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SetpointError::Blank(field));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SetpointError::NotANumber {
            field,
            input: trimmed.to_string(),
        })
}

/// Result of a setpoint submission, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetpointOutcome {
    /// The backend answered 2xx.
    Accepted,
    /// The backend answered with a non-success status.
    Rejected { status: u16, message: String },
    /// The request never completed.
    Failed(String),
}

impl SetpointOutcome {
    /// Map a backend result to an outcome.
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => SetpointOutcome::Accepted,
            Err(Error::Api { status, message }) => SetpointOutcome::Rejected { status, message },
            Err(e) => SetpointOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SetpointOutcome::Accepted)
    }

    /// User-facing notification text.
    pub fn notification(&self) -> &'static str {
        match self {
            SetpointOutcome::Accepted => "Data successfully sent to the device!",
            SetpointOutcome::Rejected { .. } => "Failed to send data to the device.",
            SetpointOutcome::Failed(_) => "Error sending data to the device.",
        }
    }
}

/// Send validated target values once and report what happened.
pub async fn submit<B>(backend: &B, values: &TargetValues) -> SetpointOutcome
where
    B: SensorBackend + ?Sized,
{
    let outcome = SetpointOutcome::from_result(backend.set_target_values(values).await);
    match &outcome {
        SetpointOutcome::Accepted => info!(
            low_ph = values.low_ph,
            high_ph = values.high_ph,
            low_ec = values.low_ec,
            "Target values sent"
        ),
        SetpointOutcome::Rejected { status, message } => {
            warn!(status, %message, "Backend rejected target values")
        }
        SetpointOutcome::Failed(error) => warn!(%error, "Failed to send target values"),
    }
    outcome
}

/// Validate the form and submit it.
///
/// Returns [`Error::InvalidSetpoint`] without touching the backend when a
/// field is invalid.
pub async fn submit_form<B>(backend: &B, form: &SetpointForm) -> Result<SetpointOutcome>
where
    B: SensorBackend + ?Sized,
{
    let values = form.validate()?;
    Ok(submit(backend, &values).await)
}
