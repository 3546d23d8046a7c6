//! JSON report writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::OutputConfig;
use crate::core::processor::Report;
use crate::error::Result;

/// Writes the report to a JSON file.
///
/// # Format
/// ```json
/// {
///   "messages": [
///     {"group": "NewsA", "text": "...", "timestamp_iso": "2024-01-01T00:00:00Z", "original_length": 163}
///   ],
///   "duration": "0 minutes",
///   "message_count": 1,
///   "time_window": {"start": "2024-01-01T00:00:00Z", "end": "2024-01-01T00:00:00Z", "duration_hours": 0.0}
/// }
/// ```
pub fn write_json(report: &Report, output_path: impl AsRef<Path>, config: &OutputConfig) -> Result<()> {
    let json = to_json(report, config)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Renders the report as a JSON string.
///
/// Same format as `write_json`, without touching the filesystem.
pub fn to_json(report: &Report, config: &OutputConfig) -> Result<String> {
    let json = if config.pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}
