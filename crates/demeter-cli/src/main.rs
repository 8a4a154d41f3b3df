use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod util;

use cli::{Cli, Commands};
use commands::{
    HistoryArgs, SetArgs, WatchArgs, cmd_config, cmd_history, cmd_read, cmd_set, cmd_watch,
};
use config::Config;
use format::FormatOptions;
use util::{connect, effective_format};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "demeter", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    #[cfg(feature = "tui")]
    if matches!(cli.command, Commands::Dashboard { .. }) {
        // The dashboard owns the terminal; log to a file instead.
        init_file_logging(filter)?;
    } else {
        init_stderr_logging(filter);
    }
    #[cfg(not(feature = "tui"))]
    init_stderr_logging(filter);

    let config = Config::load();
    let opts = FormatOptions::new(cli.no_color, config.thresholds)
        .with_compact(cli.compact);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Read { backend, output: out } => {
            let client = connect(&backend, &config)?;
            let opts = opts.with_no_header(out.no_header);
            cmd_read(&client, effective_format(out.format, cli.json), output, &opts).await?;
        }
        Commands::History {
            backend,
            output: out,
            range,
            count,
        } => {
            let client = connect(&backend, &config)?;
            let opts = opts.with_no_header(out.no_header);
            cmd_history(HistoryArgs {
                client: &client,
                ranges: range,
                count,
                format: effective_format(out.format, cli.json),
                output,
                opts: &opts,
            })
            .await?;
        }
        Commands::Set {
            backend,
            low_ph,
            high_ph,
            low_ec,
        } => {
            let client = connect(&backend, &config)?;
            cmd_set(SetArgs {
                client: &client,
                low_ph: &low_ph,
                high_ph: &high_ph,
                low_ec: &low_ec,
                quiet: cli.quiet,
                no_color: cli.no_color,
            })
            .await?;
        }
        Commands::Watch {
            backend,
            output: out,
            interval,
            count,
        } => {
            let client = connect(&backend, &config)?;
            let opts = opts.with_no_header(out.no_header);
            cmd_watch(WatchArgs {
                client: Arc::new(client),
                interval: config::resolve_interval(interval, &config),
                count,
                format: effective_format(out.format, cli.json),
                output,
                quiet: cli.quiet,
                opts: &opts,
            })
            .await?;
        }
        #[cfg(feature = "tui")]
        Commands::Dashboard { backend, interval } => {
            use demeter_cli::tui::{self, DashboardOptions, Theme};

            let options = DashboardOptions {
                backend_url: config::resolve_backend_url(backend.url, &config),
                timeout: config::resolve_timeout(backend.timeout, &config, util::DEFAULT_TIMEOUT_ARG),
                poll_interval: config::resolve_interval(interval, &config),
                history_capacity: config.history_capacity,
                thresholds: config.thresholds,
                theme: Theme::from_name(&config.dashboard.theme),
                default_metric: config.default_metric(),
            };
            tui::run(options).await?;
        }
        Commands::Config { action } => {
            cmd_config(action, cli.quiet, cli.no_color)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}

fn init_stderr_logging(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Send tracing output to `<data dir>/demeter/dashboard.log`.
#[cfg(feature = "tui")]
fn init_file_logging(filter: EnvFilter) -> Result<()> {
    use std::fs::{self, File};
    use std::sync::Mutex;

    use anyhow::Context;

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("demeter");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join("dashboard.log");
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    tracing::debug!(path = %path.display(), "Logging to file");
    Ok(())
}
