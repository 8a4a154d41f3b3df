//! Read command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use demeter_core::DemeterClient;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_reading_csv, format_reading_json, format_reading_text};
use crate::util::write_output;

pub async fn cmd_read(
    client: &DemeterClient,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let reading = client
        .current_reading()
        .await
        .with_context(|| format!("Failed to read sensors from {}", client.base_url()))?;
    debug!(?reading, "Current reading");

    let content = match format {
        OutputFormat::Json => format_reading_json(&reading, opts)?,
        OutputFormat::Csv => format_reading_csv(&reading, opts),
        OutputFormat::Text => format_reading_text(&reading, opts),
    };

    write_output(output, &content)
}
