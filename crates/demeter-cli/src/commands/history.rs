//! History command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use demeter_core::{DemeterClient, HistoryPoint, HistoryRange};
use futures::future::join_all;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::format::{
    FormatOptions, HistorySet, format_history_csv, format_history_json, format_history_text,
};
use crate::util::write_output;

/// Arguments for the history command.
pub struct HistoryArgs<'a> {
    pub client: &'a DemeterClient,
    pub ranges: Vec<HistoryRange>,
    pub count: usize,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_history(args: HistoryArgs<'_>) -> Result<()> {
    let HistoryArgs {
        client,
        ranges,
        count,
        format,
        output,
        opts,
    } = args;

    let ranges = dedup_ranges(ranges);

    // Fetch all requested views concurrently
    let results = join_all(ranges.iter().map(|&range| async move {
        let points = client
            .history(range)
            .await
            .with_context(|| format!("Failed to fetch {} history from {}", range, client.base_url()))?;
        debug!(%range, points = points.len(), "Fetched history");
        Ok::<_, anyhow::Error>(HistorySet {
            range,
            points: take_latest(points, count),
        })
    }))
    .await;

    let sets = results.into_iter().collect::<Result<Vec<_>>>()?;

    let content = match format {
        OutputFormat::Json => format_history_json(&sets, opts)?,
        OutputFormat::Csv => format_history_csv(&sets, opts),
        OutputFormat::Text => format_history_text(&sets, opts),
    };

    write_output(output, &content)
}

/// Keep the first occurrence of each range, in the order given.
fn dedup_ranges(ranges: Vec<HistoryRange>) -> Vec<HistoryRange> {
    let mut seen = Vec::with_capacity(ranges.len());
    for range in ranges {
        if !seen.contains(&range) {
            seen.push(range);
        }
    }
    seen
}

/// Keep only the most recent `count` points; 0 keeps everything.
fn take_latest(mut points: Vec<HistoryPoint>, count: usize) -> Vec<HistoryPoint> {
    if count > 0 && points.len() > count {
        points.drain(..points.len() - count);
    }
    points
}
