//! Message types flowing through the pipeline.
//!
//! - [`RawMessage`] is what the upstream extractor hands us: one record per
//!   Telegram post, with untouched text and a source-specific timestamp.
//! - [`CleanedMessage`] is what survives the transform: cleaned text and a
//!   normalized ISO-8601 timestamp.
//!
//! # Example
//!
//! ```
//! use tgbrief::RawMessage;
//!
//! let raw = RawMessage::new("NewsA", "Breaking: ...", "2024-01-01T00:00:00");
//! assert_eq!(raw.group, "NewsA");
//! ```

use serde::{Deserialize, Serialize};

/// A message record as produced by the extractor.
///
/// All fields are kept as strings: cleaning and timestamp parsing happen in
/// the transformer, so a record is never rejected while being constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Source channel or group name.
    pub group: String,

    /// Raw message body. May contain emoji, links and whitespace noise.
    pub text: String,

    /// Source timestamp in whatever format the extractor emits.
    pub timestamp: String,
}

impl RawMessage {
    /// Creates a new raw message.
    pub fn new(
        group: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// A message that passed every filter.
///
/// Serialized as one entry of the report's `messages` array:
///
/// ```json
/// {
///   "group": "NewsA",
///   "text": "cleaned body",
///   "timestamp_iso": "2024-01-01T00:00:00Z",
///   "original_length": 163
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedMessage {
    /// Source group, unchanged from the raw record.
    pub group: String,

    /// Cleaned text: no emoji, no links, single-spaced, trimmed.
    pub text: String,

    /// Timestamp normalized to UTC, `YYYY-MM-DDTHH:MM:SSZ`.
    pub timestamp_iso: String,

    /// Character count of the text this run received, before cleaning.
    #[serde(default)]
    pub original_length: usize,
}

impl CleanedMessage {
    /// Number of characters removed by cleaning.
    pub fn removed_chars(&self) -> usize {
        self.original_length
            .saturating_sub(self.text.chars().count())
    }
}

/// Feeds a previous report back into the transformer.
///
/// Re-running the transform on such records reproduces the same group,
/// text and timestamp, and so the same duration and count.
/// `original_length` is the exception: it is measured on the text the run
/// was given, which is now the cleaned text.
impl From<&CleanedMessage> for RawMessage {
    fn from(msg: &CleanedMessage) -> Self {
        RawMessage::new(&msg.group, &msg.text, &msg.timestamp_iso)
    }
}

impl From<CleanedMessage> for RawMessage {
    fn from(msg: CleanedMessage) -> Self {
        RawMessage {
            group: msg.group,
            text: msg.text,
            timestamp: msg.timestamp_iso,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_serde() {
        let json = r#"{"group":"NewsA","text":"hi","timestamp":"2024-01-01T00:00:00"}"#;
        let raw: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(raw, RawMessage::new("NewsA", "hi", "2024-01-01T00:00:00"));
    }

    #[test]
    fn test_cleaned_message_field_names() {
        let msg = CleanedMessage {
            group: "NewsA".into(),
            text: "body".into(),
            timestamp_iso: "2024-01-01T00:00:00Z".into(),
            original_length: 10,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""timestamp_iso":"2024-01-01T00:00:00Z""#));
        assert!(json.contains(r#""original_length":10"#));
        assert_eq!(msg.removed_chars(), 6);
    }

    #[test]
    fn test_cleaned_into_raw() {
        let msg = CleanedMessage {
            group: "G".into(),
            text: "t".into(),
            timestamp_iso: "2024-01-01T00:00:00Z".into(),
            original_length: 1,
        };
        let raw = RawMessage::from(&msg);
        assert_eq!(raw.timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(RawMessage::from(msg), raw);
    }
}
