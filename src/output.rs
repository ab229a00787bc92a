//! Output formatting and persistence for run results.
//!
//! Supports pretty-printing, JSON serialization, a per-stop CSV export and a
//! CSV history of run summaries.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::feed::Feed;
use crate::pipeline::{FrequencyResult, Tier};
use crate::stats::RunSummary;
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Logs a run summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &RunSummary) {
    debug!("{:#?}", summary);
}

/// Logs a run summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[derive(Serialize)]
struct StopRow<'a> {
    stop_id: &'a str,
    stop_name: Option<&'a str>,
    stop_lat: Option<f64>,
    stop_lon: Option<f64>,
    count: usize,
    frequency: f64,
    tier: Tier,
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes one row per stop, in `stop_id` order, replacing any existing file.
pub fn write_results(path: &Path, feed: &Feed, result: &FrequencyResult) -> Result<()> {
    create_parent_dir(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    let stops = feed.stop_index();

    for (stop_id, freq) in result.iter() {
        let stop = stops.get(stop_id);
        writer.serialize(StopRow {
            stop_id,
            stop_name: stop.and_then(|s| s.name.as_deref()),
            stop_lat: stop.and_then(|s| s.latitude),
            stop_lon: stop.and_then(|s| s.longitude),
            count: freq.count,
            frequency: freq.frequency,
            tier: freq.tier,
        })?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = result.len(), "Wrote stop results");
    Ok(())
}

/// Appends a [`RunSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    create_parent_dir(path)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}
