//! Platform-agnostic types for the Demeter hydroponics dashboard.
//!
//! This crate provides the data model shared by the HTTP client
//! (demeter-core) and the terminal front ends (demeter-cli).
//!
//! # Features
//!
//! - Typed readings and history points for temperature, pH, and EC
//! - The pH fallback rule between the primary and alternate sources
//! - A lenient schema for the backend's JSON payloads (`serde` feature)
//! - The wire shape of setpoint updates
//!
//! # Example
//!
//! ```
//! use demeter_types::{Metric, resolve_ph};
//!
//! assert_eq!(resolve_ph(Some(0.0), Some(6.2)), 6.2);
//! assert_eq!(Metric::Ph.label(), "pH Level");
//! ```

pub mod error;
#[cfg(feature = "serde")]
pub mod payload;
pub mod types;

pub use error::ParseError;
#[cfg(feature = "serde")]
pub use payload::{RawReading, history_from_records, parse_timestamp};
pub use types::{CurrentReading, HistoryPoint, Metric, TargetValues, resolve_ph};

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn nonzero_primary_always_wins(primary in -14.0f64..14.0, alt in proptest::option::of(0.0f64..14.0)) {
            prop_assume!(primary != 0.0);
            prop_assert_eq!(resolve_ph(Some(primary), alt), primary);
        }

        #[test]
        fn zero_primary_yields_alternate(alt in 0.0f64..14.0) {
            prop_assert_eq!(resolve_ph(Some(0.0), Some(alt)), alt);
            prop_assert_eq!(resolve_ph(None, Some(alt)), alt);
        }
    }
}
