//! Watch command implementation.
//!
//! Drives the same polling controller as the dashboard, with both history
//! fetches disabled, and prints one line per completed poll. Failures are
//! reported only when connectivity changes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use demeter_core::{DashboardEvent, DemeterClient, PollerConfig, poller};
use owo_colors::OwoColorize;

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, format_reading_json, format_watch_csv_header, format_watch_csv_line,
    format_watch_line,
};
use crate::util::append_output;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub client: Arc<DemeterClient>,
    pub interval: Duration,
    pub count: u32,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        client,
        interval,
        count,
        format,
        output,
        quiet,
        opts,
    } = args;

    if !quiet {
        let url = client.base_url().to_string();
        let header = if opts.no_color {
            format!("Watching: {}", url)
        } else {
            format!("Watching: {}", url.cyan())
        };
        eprintln!("{}", header);
        if count > 0 {
            eprintln!(
                "Interval: {}s | Count: {} | Press Ctrl+C to stop",
                interval.as_secs(),
                count
            );
        } else {
            eprintln!("Interval: {}s | Press Ctrl+C to stop", interval.as_secs());
        }
        eprintln!("{}", "-".repeat(50));
    }

    let (handle, mut events) = poller::spawn(client, PollerConfig::readings_only(interval));

    let mut header_written = opts.no_header;
    let mut readings_taken: u32 = 0;
    let mut connected: Option<bool> = None;

    loop {
        let event = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                break;
            }
            event = events.recv() => event,
        };

        let Some(event) = event else {
            break;
        };

        match event {
            DashboardEvent::ReadingUpdated { reading, .. } => {
                if connected == Some(false) && !quiet {
                    eprintln!("Connection restored.");
                }
                connected = Some(true);
                readings_taken += 1;

                let clock = Local::now().format("%H:%M:%S").to_string();
                let content = match format {
                    OutputFormat::Json => format_reading_json(&reading, &opts.with_compact(true))?,
                    OutputFormat::Csv => {
                        let mut out = String::new();
                        if !header_written {
                            out.push_str(&format_watch_csv_header());
                            header_written = true;
                        }
                        out.push_str(&format_watch_csv_line(&reading, &clock, opts));
                        out
                    }
                    OutputFormat::Text => format_watch_line(&reading, &clock, opts),
                };
                append_output(output, &content)?;

                if count > 0 && readings_taken >= count {
                    if !quiet {
                        eprintln!("Completed {} readings.", readings_taken);
                    }
                    break;
                }
            }
            DashboardEvent::ReadingFailed { error } => {
                if connected != Some(false) {
                    let msg = format!("Connection lost: {}. Will keep polling.", error);
                    if opts.no_color {
                        eprintln!("{}", msg);
                    } else {
                        eprintln!("{}", msg.yellow());
                    }
                }
                connected = Some(false);
            }
            _ => {}
        }
    }

    handle.shutdown().await;
    Ok(())
}
