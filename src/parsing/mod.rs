//! Input boundary: turning an extractor document into records.
//!
//! Two document shapes are accepted:
//!
//! - a JSON array of record objects, decoded with a
//!   [`RecordSchema`] ([`records`])
//! - a digest envelope carrying one `news_content` text blob ([`digest`])
//!
//! Anything else is a structural error and aborts the run. Problems inside a
//! single record never do; they surface as `Err` entries of the returned
//! vector.

pub mod digest;
pub mod records;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::RecordSchema;
use crate::core::processor::RecordResult;
use crate::error::{BriefError, Result};

pub use digest::{find_digest, parse_digest};
pub use records::{decode_record, decode_records, extract_telegram_text};

/// Turns a parsed document into records.
///
/// # Errors
///
/// Returns [`BriefError::InvalidFormat`] if the document is neither a record
/// array nor a digest envelope.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tgbrief::config::RecordSchema;
/// use tgbrief::parsing::load_records;
///
/// # fn main() -> tgbrief::Result<()> {
/// let doc = json!([
///     {"group": "NewsA", "text": "hello", "timestamp": "2024-01-01T00:00:00"},
///     {"group": "NewsB"}
/// ]);
/// let records = load_records(&doc, &RecordSchema::default())?;
/// assert!(records[0].is_ok());
/// assert!(records[1].is_err());
///
/// assert!(load_records(&json!("text"), &RecordSchema::default()).is_err());
/// # Ok(())
/// # }
/// ```
pub fn load_records(value: &Value, schema: &RecordSchema) -> Result<Vec<RecordResult>> {
    if let Some(content) = find_digest(value)? {
        return Ok(parse_digest(&content).into_iter().map(Ok).collect());
    }

    match value {
        Value::Array(items) => Ok(decode_records(items, schema)),
        other => Err(BriefError::invalid_format(
            "message export",
            format!(
                "expected an array of records or a digest envelope, found {}",
                json_kind(other)
            ),
        )),
    }
}

/// Parses JSON text and turns it into records.
pub fn load_str(input: &str, schema: &RecordSchema) -> Result<Vec<RecordResult>> {
    let value: Value = serde_json::from_str(input)?;
    load_records(&value, schema)
}

/// Reads a JSON file and turns it into records.
pub fn load_file(path: impl AsRef<Path>, schema: &RecordSchema) -> Result<Vec<RecordResult>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| BriefError::json_in(e, path))?;
    load_records(&value, schema)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
