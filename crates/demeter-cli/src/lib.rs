//! Command-line interface and terminal dashboard for the Demeter
//! hydroponics controller.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `read` | Read the current temperature, pH and EC |
//! | `history` | Fetch the 24-hour, 7-day or all-time series |
//! | `set` | Send dosing setpoints |
//! | `watch` | Continuously poll the current reading |
//! | `dashboard` | Interactive terminal dashboard |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! Settings live in `~/.config/demeter/config.toml` (or the platform
//! equivalent): backend URL, poll interval, request timeout, trend window
//! size, card thresholds and dashboard theme.
//!
//! # Environment Variables
//!
//! - `DEMETER_URL`: backend base URL (overridden by `--url`)
//! - `NO_COLOR`: disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! demeter read --url http://192.168.1.40:5000
//! demeter history --range 24h,7d --format csv
//! demeter set --low-ph 5.5 --high-ph 6.4 --low-ec 1800
//! demeter dashboard
//! ```

pub use demeter_core;
pub use demeter_types;

#[cfg(feature = "tui")]
pub mod tui;
