//! Timestamp parsing and ISO-8601 normalization.
//!
//! Upstream extractors are not consistent about timestamps, so parsing tries,
//! in order:
//!
//! 1. RFC 3339 (`2024-01-01T10:00:00+03:00`), converted to UTC
//! 2. each naive layout of the [`RecordSchema`](crate::config::RecordSchema),
//!    interpreted as UTC
//! 3. unix seconds (`"1704067200"`)

use chrono::{DateTime, NaiveDateTime, Utc};

/// Output layout of every normalized timestamp.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses a source timestamp, returning `None` if no layout matches.
///
/// # Example
///
/// ```
/// use tgbrief::core::timestamp::{parse_timestamp, to_iso};
///
/// let formats = vec!["%Y-%m-%d %H:%M:%S".to_string()];
/// let ts = parse_timestamp("2024-01-01 08:30:00", &formats).unwrap();
/// assert_eq!(to_iso(&ts), "2024-01-01T08:30:00Z");
/// ```
pub fn parse_timestamp(input: &str, formats: &[String]) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| parse_unix_timestamp(input))
}

/// Parses a unix timestamp in seconds.
///
/// Only plain ASCII digit strings are accepted; signs and spaces are not.
pub fn parse_unix_timestamp(ts_str: &str) -> Option<DateTime<Utc>> {
    if ts_str.is_empty() || !ts_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    ts_str
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn to_iso(ts: &DateTime<Utc>) -> String {
    ts.format(ISO_FORMAT).to_string()
}
