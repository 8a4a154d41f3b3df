//! Command implementations for the CLI.

mod config;
mod history;
mod read;
mod set;
mod watch;

pub use config::cmd_config;
pub use history::{HistoryArgs, cmd_history};
pub use read::cmd_read;
pub use set::{SetArgs, cmd_set};
pub use watch::{WatchArgs, cmd_watch};
