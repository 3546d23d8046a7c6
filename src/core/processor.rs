//! The transform pipeline.
//!
//! For every record, in input order: clean the text, apply the
//! [`FilterRules`], parse the timestamp. Survivors become
//! [`CleanedMessage`]s; the [`Report`] duration is computed from their
//! timestamps only.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::TransformConfig;
use crate::core::clean::clean_text;
use crate::core::filter::{DropReason, FilterRules};
use crate::core::timestamp::{parse_timestamp, to_iso};
use crate::error::{RecordError, Result};
use crate::message::{CleanedMessage, RawMessage};

/// The JSON envelope handed to prompt assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Surviving messages, in input order
    pub messages: Vec<CleanedMessage>,
    /// Span between the earliest and latest surviving message
    pub duration: String,
    /// Always `messages.len()`
    pub message_count: usize,
    /// Exact bounds of the span; absent when nothing survived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

/// Bounds of the covered period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
    /// Span in hours, rounded to two decimals
    pub duration_hours: f64,
}

impl Report {
    /// Builds a report from survivors and their parsed timestamps.
    fn build(messages: Vec<CleanedMessage>, timestamps: &[DateTime<Utc>]) -> Self {
        let bounds = timestamps
            .iter()
            .min()
            .zip(timestamps.iter().max());

        let (duration, time_window) = match bounds {
            Some((start, end)) => {
                let span = *end - *start;
                let hours = span.num_seconds() as f64 / 3600.0;
                (
                    format_duration(span),
                    Some(TimeWindow {
                        start: to_iso(start),
                        end: to_iso(end),
                        duration_hours: (hours * 100.0).round() / 100.0,
                    }),
                )
            }
            None => (format_duration(TimeDelta::zero()), None),
        };

        Self {
            message_count: messages.len(),
            messages,
            duration,
            time_window,
        }
    }

    /// Returns `true` if no message survived.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Formats a span as `"X hours Y minutes"`.
///
/// Zero components are omitted, units are singular for 1, seconds are
/// truncated and a zero (or negative) span is `"0 minutes"`.
///
/// ```
/// use chrono::TimeDelta;
/// use tgbrief::core::processor::format_duration;
///
/// assert_eq!(format_duration(TimeDelta::hours(4)), "4 hours");
/// assert_eq!(format_duration(TimeDelta::minutes(61)), "1 hour 1 minute");
/// assert_eq!(format_duration(TimeDelta::seconds(59)), "0 minutes");
/// ```
pub fn format_duration(span: TimeDelta) -> String {
    let total_minutes = span.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let unit = |n: i64, word: &str| {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    };

    match (hours, minutes) {
        (0, m) => unit(m, "minute"),
        (h, 0) => unit(h, "hour"),
        (h, m) => format!("{} {}", unit(h, "hour"), unit(m, "minute")),
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Records seen, well-formed or not
    pub input: usize,
    /// Records that made it into the report
    pub kept: usize,
    pub malformed: usize,
    pub too_short: usize,
    pub excluded_group: usize,
    pub excluded_content: usize,
    pub promotional: usize,
    pub bad_timestamp: usize,
    /// Kept messages per group
    pub groups: BTreeMap<String, usize>,
}

impl TransformStats {
    fn record_drop(&mut self, reason: DropReason) {
        let counter = match reason {
            DropReason::Malformed => &mut self.malformed,
            DropReason::TooShort => &mut self.too_short,
            DropReason::ExcludedGroup => &mut self.excluded_group,
            DropReason::ExcludedContent => &mut self.excluded_content,
            DropReason::Promotional => &mut self.promotional,
            DropReason::BadTimestamp => &mut self.bad_timestamp,
        };
        *counter += 1;
    }

    fn record_kept(&mut self, group: &str) {
        self.kept += 1;
        *self.groups.entry(group.to_string()).or_default() += 1;
    }

    /// Total number of dropped records.
    pub fn dropped(&self) -> usize {
        self.input - self.kept
    }

    /// Percentage of input records dropped.
    pub fn drop_ratio(&self) -> f64 {
        if self.input == 0 {
            return 0.0;
        }
        self.dropped() as f64 / self.input as f64 * 100.0
    }

    /// The `n` groups with the most kept messages, largest first.
    pub fn top_groups(&self, n: usize) -> Vec<(&str, usize)> {
        let mut groups: Vec<(&str, usize)> = self
            .groups
            .iter()
            .map(|(g, c)| (g.as_str(), *c))
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        groups.truncate(n);
        groups
    }
}

/// A report together with the counters of the run that produced it.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub report: Report,
    pub stats: TransformStats,
}

/// A decoded record or the reason it could not be decoded.
pub type RecordResult = std::result::Result<RawMessage, RecordError>;

/// Reusable, configured transform.
///
/// # Example
///
/// ```
/// use tgbrief::config::TransformConfig;
/// use tgbrief::core::Transformer;
/// use tgbrief::RawMessage;
///
/// # fn main() -> tgbrief::Result<()> {
/// let transformer = Transformer::new(&TransformConfig::new().with_min_length(10))?;
/// let outcome = transformer.transform(&[
///     RawMessage::new("NewsA", "Markets opened higher 📈 today", "2024-01-01T09:00:00"),
///     RawMessage::new("NewsA", "ok", "2024-01-01T10:00:00"),
/// ]);
///
/// assert_eq!(outcome.report.message_count, 1);
/// assert_eq!(outcome.report.messages[0].text, "Markets opened higher today");
/// assert_eq!(outcome.stats.too_short, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transformer {
    rules: FilterRules,
    timestamp_formats: Vec<String>,
}

impl Transformer {
    /// Compiles a transformer from a configuration.
    pub fn new(config: &TransformConfig) -> Result<Self> {
        Ok(Self {
            rules: FilterRules::from_config(config)?,
            timestamp_formats: config.schema.timestamp_formats.clone(),
        })
    }

    /// Default settings with only a group exclusion set.
    pub fn with_excluded_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: FilterRules::with_excluded_groups(groups),
            timestamp_formats: TransformConfig::default().schema.timestamp_formats,
        }
    }

    /// Transforms already-decoded records.
    pub fn transform(&self, raw_messages: &[RawMessage]) -> Outcome {
        self.process(raw_messages.iter().map(Ok::<_, RecordError>))
    }

    /// Transforms records straight from the decoder.
    ///
    /// Decoding failures are counted as [`DropReason::Malformed`] and never
    /// abort the run.
    pub fn process<I, R>(&self, records: I) -> Outcome
    where
        I: IntoIterator<Item = std::result::Result<R, RecordError>>,
        R: Borrow<RawMessage>,
    {
        let mut stats = TransformStats::default();
        let mut messages = Vec::new();
        let mut timestamps = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            stats.input += 1;

            let owned = match record {
                Ok(raw) => raw,
                Err(err) => {
                    debug!(%err, "dropping malformed record");
                    stats.record_drop(DropReason::Malformed);
                    continue;
                }
            };
            let raw: &RawMessage = owned.borrow();

            match self.transform_one(raw) {
                Ok((message, ts)) => {
                    stats.record_kept(&message.group);
                    messages.push(message);
                    timestamps.push(ts);
                }
                Err(reason) => {
                    debug!(index, group = %raw.group, %reason, "dropping record");
                    stats.record_drop(reason);
                }
            }
        }

        let report = Report::build(messages, &timestamps);

        info!(
            input = stats.input,
            kept = stats.kept,
            malformed = stats.malformed,
            too_short = stats.too_short,
            excluded_group = stats.excluded_group,
            excluded_content = stats.excluded_content,
            promotional = stats.promotional,
            bad_timestamp = stats.bad_timestamp,
            duration = %report.duration,
            "transform finished"
        );
        if stats.input > 0 && stats.kept == 0 {
            warn!(input = stats.input, "every record was dropped");
        }

        Outcome { report, stats }
    }

    /// Clean, filter, then parse the timestamp of a single record.
    fn transform_one(
        &self,
        raw: &RawMessage,
    ) -> std::result::Result<(CleanedMessage, DateTime<Utc>), DropReason> {
        let text = clean_text(&raw.text);
        self.rules.check(&raw.group, &text)?;

        let ts = parse_timestamp(&raw.timestamp, &self.timestamp_formats)
            .ok_or(DropReason::BadTimestamp)?;

        Ok((
            CleanedMessage {
                group: raw.group.clone(),
                text,
                timestamp_iso: to_iso(&ts),
                original_length: raw.text.chars().count(),
            },
            ts,
        ))
    }
}

/// Transforms messages with default settings and the given excluded groups.
///
/// ```
/// use std::collections::HashSet;
/// use tgbrief::{RawMessage, transform};
///
/// let excluded: HashSet<String> = ["Promo".to_string()].into();
/// let report = transform(
///     &[RawMessage::new("Promo", "x".repeat(200), "2024-01-01T00:00:00")],
///     &excluded,
/// );
/// assert_eq!(report.message_count, 0);
/// assert_eq!(report.duration, "0 minutes");
/// ```
pub fn transform(raw_messages: &[RawMessage], excluded_groups: &HashSet<String>) -> Report {
    Transformer::with_excluded_groups(excluded_groups)
        .transform(raw_messages)
        .report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(len: usize) -> String {
        "a".repeat(len)
    }

    fn msg(group: &str, len: usize, ts: &str) -> RawMessage {
        RawMessage::new(group, body(len), ts)
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::zero()), "0 minutes");
        assert_eq!(format_duration(TimeDelta::minutes(1)), "1 minute");
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45 minutes");
        assert_eq!(format_duration(TimeDelta::hours(1)), "1 hour");
        assert_eq!(format_duration(TimeDelta::hours(4)), "4 hours");
        assert_eq!(format_duration(TimeDelta::minutes(150)), "2 hours 30 minutes");
        assert_eq!(format_duration(TimeDelta::hours(30)), "30 hours");
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "0 minutes");
    }

    #[test]
    fn test_empty_input() {
        let outcome = Transformer::with_excluded_groups::<_, &str>([]).transform(&[]);
        assert!(outcome.report.is_empty());
        assert_eq!(outcome.report.duration, "0 minutes");
        assert!(outcome.report.time_window.is_none());
        assert_eq!(outcome.stats, TransformStats::default());
    }

    #[test]
    fn test_order_preserved_not_sorted() {
        let t = Transformer::with_excluded_groups::<_, &str>([]);
        let outcome = t.transform(&[
            msg("B", 150, "2024-01-01T12:00:00"),
            msg("A", 150, "2024-01-01T08:00:00"),
            msg("C", 150, "2024-01-01T10:00:00"),
        ]);
        let groups: Vec<_> = outcome
            .report
            .messages
            .iter()
            .map(|m| m.group.as_str())
            .collect();
        assert_eq!(groups, vec!["B", "A", "C"]);

        let window = outcome.report.time_window.unwrap();
        assert_eq!(window.start, "2024-01-01T08:00:00Z");
        assert_eq!(window.end, "2024-01-01T12:00:00Z");
        assert!((window.duration_hours - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duration_ignores_dropped_records() {
        let t = Transformer::with_excluded_groups(["Promo"]);
        let outcome = t.transform(&[
            msg("Promo", 150, "2024-01-01T00:00:00"),
            msg("NewsA", 150, "2024-01-01T10:00:00"),
            msg("NewsA", 20, "2024-01-01T23:00:00"),
            msg("NewsA", 150, "2024-01-01T11:30:00"),
        ]);
        assert_eq!(outcome.report.message_count, 2);
        assert_eq!(outcome.report.duration, "1 hour 30 minutes");
        assert_eq!(outcome.stats.excluded_group, 1);
        assert_eq!(outcome.stats.too_short, 1);
    }

    #[test]
    fn test_malformed_records_counted() {
        let t = Transformer::with_excluded_groups::<_, &str>([]);
        let records: Vec<RecordResult> = vec![
            Ok(msg("NewsA", 150, "2024-01-01T00:00:00")),
            Err(RecordError::NotAnObject { index: 1 }),
            Err(RecordError::MissingField {
                index: 2,
                field: "text".into(),
            }),
        ];
        let outcome = t.process(records);
        assert_eq!(outcome.stats.input, 3);
        assert_eq!(outcome.stats.malformed, 2);
        assert_eq!(outcome.report.message_count, 1);
        assert_eq!(outcome.stats.dropped(), 2);
    }

    #[test]
    fn test_bad_timestamp_dropped() {
        let t = Transformer::with_excluded_groups::<_, &str>([]);
        let outcome = t.transform(&[
            msg("NewsA", 150, "not a date"),
            msg("NewsA", 150, "2024-01-01T00:00:00"),
        ]);
        assert_eq!(outcome.report.message_count, 1);
        assert_eq!(outcome.stats.bad_timestamp, 1);
    }

    #[test]
    fn test_original_length_recorded() {
        let t = Transformer::with_excluded_groups::<_, &str>([]);
        let text = format!("🔥🔥 {} https://t.me/x", body(120));
        let outcome = t.transform(&[RawMessage::new("G", text.clone(), "2024-01-01T00:00:00")]);
        let kept = &outcome.report.messages[0];
        assert_eq!(kept.original_length, text.chars().count());
        assert_eq!(kept.text.chars().count(), 120);
    }

    #[test]
    fn test_top_groups() {
        let t = Transformer::with_excluded_groups::<_, &str>([]);
        let outcome = t.transform(&[
            msg("B", 150, "2024-01-01T00:00:00"),
            msg("A", 150, "2024-01-01T00:00:00"),
            msg("B", 150, "2024-01-01T00:00:00"),
            msg("C", 150, "2024-01-01T00:00:00"),
        ]);
        assert_eq!(outcome.stats.top_groups(2), vec![("B", 2), ("A", 1)]);
        assert!((outcome.stats.drop_ratio() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_fn_uses_excluded_set() {
        let excluded: HashSet<String> = ["Promo".to_string()].into();
        let report = transform(
            &[
                msg("Promo", 150, "2024-01-01T00:00:00"),
                msg("NewsA", 150, "2024-01-01T00:00:00"),
            ],
            &excluded,
        );
        assert_eq!(report.message_count, 1);
        assert_eq!(report.messages[0].group, "NewsA");
    }
}
