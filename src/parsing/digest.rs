//! Decoding of digest envelopes.
//!
//! Some extractor deployments do not emit a record array. They return a
//! single text blob, `news_content`, in which every group's posts are
//! concatenated:
//!
//! ```text
//! **Group: NewsA**
//! [2024-01-01 09:00:00] First post...
//! ----------------------------------------------------------------------
//! [2024-01-01 09:30:00] Second post...
//! **Group: NewsB**
//! ...
//! ```
//!
//! The blob may be wrapped in a Lambda-style response:
//! `{"result": {"body": "<json string>"}}`, or the same inside a one-element
//! array. [`find_digest`] unwraps those shapes; [`parse_digest`] splits the
//! text into [`RawMessage`]s.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{BriefError, Result};
use crate::message::RawMessage;

const FORMAT: &str = "digest envelope";

static GROUP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Group: (.+?)\*\*").expect("group header pattern is valid"));

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{70,}").expect("block separator pattern is valid"));

static STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\]").expect("stamp pattern is valid")
});

/// Looks for a digest in a parsed input document.
///
/// Returns `Ok(None)` when the document is not an envelope at all (for
/// example a plain record array).
///
/// # Errors
///
/// Returns [`BriefError::InvalidFormat`] when the document looks like an
/// envelope (`news_content` or `result` key) but holds no usable digest.
pub fn find_digest(value: &Value) -> Result<Option<String>> {
    let envelope = match value {
        Value::Object(obj) if obj.contains_key("news_content") || obj.contains_key("result") => {
            value
        }
        Value::Array(items) => match items.first() {
            Some(first) if first.get("result").is_some() => first,
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };

    if let Some(content) = envelope.get("news_content") {
        return news_content(content).map(Some);
    }

    let body = envelope
        .get("result")
        .and_then(|result| result.get("body"))
        .ok_or_else(|| BriefError::invalid_format(FORMAT, "'result' has no 'body'"))?;

    let body = match body {
        Value::String(s) => serde_json::from_str::<Value>(s).map_err(|e| {
            BriefError::invalid_format(FORMAT, format!("'body' is not valid JSON: {e}"))
        })?,
        other => other.clone(),
    };

    let content = body
        .get("news_content")
        .ok_or_else(|| BriefError::invalid_format(FORMAT, "'body' has no 'news_content'"))?;
    news_content(content).map(Some)
}

fn news_content(value: &Value) -> Result<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(BriefError::invalid_format(FORMAT, "'news_content' is empty")),
        _ => Err(BriefError::invalid_format(
            FORMAT,
            "'news_content' must be a string",
        )),
    }
}

/// Splits digest text into raw messages, in document order.
///
/// Text before the first group header is ignored. Within a group, blocks
/// are separated by lines of 70 or more dashes; empty blocks are skipped.
/// The first `[YYYY-MM-DD HH:MM:SS]` stamp of a block becomes the
/// timestamp and is removed from the text. A block without a stamp gets an
/// empty timestamp and is later dropped by the transformer.
///
/// # Example
///
/// ```
/// use tgbrief::parsing::digest::parse_digest;
///
/// let text = "**Group: NewsA**\n[2024-01-01 09:00:00] Hello";
/// let messages = parse_digest(text);
/// assert_eq!(messages[0].group, "NewsA");
/// assert_eq!(messages[0].timestamp, "2024-01-01 09:00:00");
/// assert_eq!(messages[0].text, "Hello");
/// ```
pub fn parse_digest(content: &str) -> Vec<RawMessage> {
    let headers: Vec<_> = GROUP_HEADER.captures_iter(content).collect();
    let mut messages = Vec::new();

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let group = name.as_str().trim();
        let section_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let section = &content[whole.end()..section_end];

        for block in BLOCK_SEPARATOR.split(section) {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }
            messages.push(parse_block(group, block));
        }
    }

    messages
}

fn parse_block(group: &str, block: &str) -> RawMessage {
    match STAMP.captures(block) {
        Some(caps) => {
            let (Some(whole), Some(stamp)) = (caps.get(0), caps.get(1)) else {
                return RawMessage::new(group, block, "");
            };
            let mut text = String::with_capacity(block.len());
            text.push_str(&block[..whole.start()]);
            text.push_str(&block[whole.end()..]);
            RawMessage::new(group, text.trim(), stamp.as_str())
        }
        None => RawMessage::new(group, block, ""),
    }
}
