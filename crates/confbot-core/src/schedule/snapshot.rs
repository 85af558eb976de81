//! JSON snapshot of scraped events.
//!
//! The scraper writes its output as a pretty-printed JSON array of raw
//! records; this is the only persisted form of the schedule.

use std::path::Path;

use tracing::debug;

use super::Schedule;
use crate::error::Result;
use crate::event::{Normalizer, RawEvent};

/// Read raw records without normalizing them.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON array of
/// records.
pub fn read_raw_events(path: &Path) -> Result<Vec<RawEvent>> {
    let content = std::fs::read_to_string(path)?;
    let raw: Vec<RawEvent> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), records = raw.len(), "snapshot read");
    Ok(raw)
}

/// Read and normalize a snapshot.
///
/// # Errors
/// Returns an error on I/O or JSON failure, or if any record is invalid.
pub fn load_snapshot(path: &Path, normalizer: &Normalizer) -> Result<Schedule> {
    let raw = read_raw_events(path)?;
    Ok(Schedule::load_with(normalizer, &raw)?)
}

/// Write raw records as pretty JSON, replacing any existing file.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn save_snapshot(path: &Path, raw_events: &[RawEvent]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(raw_events)?;
    std::fs::write(path, content)?;
    Ok(())
}
