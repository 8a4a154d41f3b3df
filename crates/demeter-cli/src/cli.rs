//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use demeter_core::HistoryRange;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Reusable backend connection arguments
#[derive(Debug, Clone, Args)]
pub struct BackendArgs {
    /// Backend base URL, or use DEMETER_URL env var
    #[arg(short, long, env = "DEMETER_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 'T', long, default_value = "10")]
    pub timeout: u64,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Parser)]
#[command(name = "demeter")]
#[command(author, version, about = "CLI and dashboard for the Demeter hydroponics controller", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the current temperature, pH and EC
    Read {
        #[command(flatten)]
        backend: BackendArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Retrieve historical data (24h, 7d, all)
    History {
        #[command(flatten)]
        backend: BackendArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// History view(s) to fetch, comma-separated (24h, 7d, all)
        #[arg(short, long, value_delimiter = ',', default_value = "7d")]
        range: Vec<HistoryRange>,

        /// Only show the most recent N points (0 for all)
        #[arg(short, long, default_value = "0")]
        count: usize,
    },

    /// Send dosing setpoints to the device
    Set {
        #[command(flatten)]
        backend: BackendArgs,

        /// Below this pH the device doses pH-up solution
        #[arg(long, allow_hyphen_values = true)]
        low_ph: String,

        /// Above this pH the device doses pH-down solution
        #[arg(long, allow_hyphen_values = true)]
        high_ph: String,

        /// Maximum nutrient concentration (sent as low_EC)
        #[arg(long, allow_hyphen_values = true)]
        low_ec: String,
    },

    /// Continuously poll the current reading
    Watch {
        #[command(flatten)]
        backend: BackendArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Polling interval in seconds (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Number of readings to take before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,
    },

    /// Open the interactive terminal dashboard
    #[cfg(feature = "tui")]
    Dashboard {
        #[command(flatten)]
        backend: BackendArgs,

        /// Polling interval in seconds (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Backend base URL
    Url,
    /// Polling interval in seconds
    Interval,
    /// Request timeout in seconds
    Timeout,
    /// Number of points kept in the trend window
    HistoryCapacity,
    /// Dashboard theme (dark, light)
    Theme,
    /// Metric shown first on the trend chart (temp, ph, ec, all)
    Metric,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (reset to default) a configuration value
    Unset {
        /// Configuration key to reset
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
