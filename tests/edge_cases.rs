//! Edge case tests for tgbrief.
//!
//! Inputs that upstream extractors actually produce: empty exports, odd
//! timestamps, non-Latin scripts, envelopes with missing parts.

use std::collections::HashSet;

use serde_json::json;
use tgbrief::prelude::*;

fn padded(text: &str) -> String {
    format!("{text} {}", "Details follow in the full report from the regional office today.".repeat(2))
}

// ============================================================================
// Empty and degenerate inputs
// ============================================================================

#[test]
fn test_empty_input() {
    let report = transform(&[], &HashSet::new());
    assert!(report.is_empty());
    assert_eq!(report.message_count, 0);
    assert_eq!(report.duration, "0 minutes");
    assert!(report.time_window.is_none());
}

#[test]
fn test_empty_array_document() {
    let records = load_str("[]", &RecordSchema::default()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_all_records_malformed() {
    let records = load_str(r#"[1, null, {"group": 5}, []]"#, &RecordSchema::default()).unwrap();
    let outcome = Transformer::with_excluded_groups::<_, &str>([]).process(records);

    assert_eq!(outcome.stats.input, 4);
    assert_eq!(outcome.stats.malformed, 4);
    assert!(outcome.report.is_empty());
}

#[test]
fn test_text_that_is_only_noise() {
    let noise = "🔥🔥🔥 @channel https://example.com t.me/+invite ---------- [x](y) ".repeat(5);
    let report = transform(
        &[RawMessage::new("NewsA", noise, "2024-01-01T00:00:00")],
        &HashSet::new(),
    );
    assert!(report.is_empty());
}

#[test]
fn test_empty_timestamp_is_dropped() {
    let transformer = Transformer::with_excluded_groups::<_, &str>([]);
    let outcome = transformer.transform(&[RawMessage::new("NewsA", padded("Post"), "")]);
    assert_eq!(outcome.stats.bad_timestamp, 1);
}

// ============================================================================
// Length boundary
// ============================================================================

#[test]
fn test_exactly_min_length_is_dropped() {
    let config = TransformConfig::new().with_min_length(10);
    let transformer = Transformer::new(&config).unwrap();

    let outcome = transformer.transform(&[
        RawMessage::new("G", "abcdefghij", "2024-01-01T00:00:00"),
        RawMessage::new("G", "abcdefghijk", "2024-01-01T00:00:00"),
    ]);

    assert_eq!(outcome.report.message_count, 1);
    assert_eq!(outcome.report.messages[0].text, "abcdefghijk");
    assert_eq!(outcome.stats.too_short, 1);
}

#[test]
fn test_length_counts_characters_not_bytes() {
    let config = TransformConfig::new().with_min_length(10);
    let transformer = Transformer::new(&config).unwrap();

    // 10 Cyrillic chars are 20 bytes
    let outcome = transformer.transform(&[RawMessage::new("G", "абвгдежзий", "2024-01-01T00:00:00")]);
    assert_eq!(outcome.stats.too_short, 1);
}

#[test]
fn test_length_checked_after_cleaning() {
    let config = TransformConfig::new().with_min_length(20);
    let transformer = Transformer::new(&config).unwrap();

    let text = format!("Short news {}", "🔥".repeat(40));
    let outcome = transformer.transform(&[RawMessage::new("G", text, "2024-01-01T00:00:00")]);
    assert_eq!(outcome.stats.too_short, 1);
}

// ============================================================================
// Unicode
// ============================================================================

#[test]
fn test_non_latin_text_survives_cleaning() {
    let text = "当局确认大桥将在维修后于周一重新开放。Власти сообщили о ремонте моста. 🚧";
    assert_eq!(
        clean_text(text),
        "当局确认大桥将在维修后于周一重新开放。Власти сообщили о ремонте моста."
    );
}

#[test]
fn test_zwj_family_emoji_fully_removed() {
    assert_eq!(
        clean_text("Family 👨\u{200D}👩\u{200D}👧\u{200D}👦 day"),
        "Family day"
    );
}

#[test]
fn test_keycap_and_flag_removed() {
    assert_eq!(clean_text("Step 1\u{FE0F}\u{20E3} in 🇺🇦 today"), "Step 1 in today");
}

#[test]
fn test_unicode_group_exclusion() {
    let report = transform(
        &[RawMessage::new("Новости", padded("Пост"), "2024-01-01T00:00:00")],
        &["новости".to_string()].into(),
    );
    assert!(report.is_empty());
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn test_mixed_timestamp_layouts() {
    let transformer = Transformer::with_excluded_groups::<_, &str>([]);
    let outcome = transformer.transform(&[
        RawMessage::new("G", padded("A"), "2024-01-01T10:00:00+02:00"),
        RawMessage::new("G", padded("B"), "2024-01-01 09:00:00"),
        RawMessage::new("G", padded("C"), "[2024-01-01 10:30:00]"),
        RawMessage::new("G", padded("D"), "1704105000"),
        RawMessage::new("G", padded("E"), "2024-01-01T09:15:00.250"),
    ]);

    let stamps: Vec<&str> = outcome
        .report
        .messages
        .iter()
        .map(|m| m.timestamp_iso.as_str())
        .collect();
    assert_eq!(
        stamps,
        [
            "2024-01-01T08:00:00Z",
            "2024-01-01T09:00:00Z",
            "2024-01-01T10:30:00Z",
            "2024-01-01T10:30:00Z",
            "2024-01-01T09:15:00Z",
        ]
    );
    assert_eq!(outcome.report.duration, "2 hours 30 minutes");
}

#[test]
fn test_order_is_input_order_not_chronological() {
    let report = transform(
        &[
            RawMessage::new("G", padded("late"), "2024-01-01T12:00:00"),
            RawMessage::new("G", padded("early"), "2024-01-01T08:00:00"),
        ],
        &HashSet::new(),
    );
    assert!(report.messages[0].text.starts_with("late"));
    assert!(report.messages[1].text.starts_with("early"));
    assert_eq!(report.duration, "4 hours");
}

#[test]
fn test_seconds_are_truncated_in_duration() {
    let report = transform(
        &[
            RawMessage::new("G", padded("A"), "2024-01-01T08:00:00"),
            RawMessage::new("G", padded("B"), "2024-01-01T09:01:59"),
        ],
        &HashSet::new(),
    );
    assert_eq!(report.duration, "1 hour 1 minute");
}

#[test]
fn test_multi_day_span_in_hours() {
    let report = transform(
        &[
            RawMessage::new("G", padded("A"), "2024-01-01T08:00:00"),
            RawMessage::new("G", padded("B"), "2024-01-03T10:00:00"),
        ],
        &HashSet::new(),
    );
    assert_eq!(report.duration, "50 hours");
}

// ============================================================================
// Envelope shapes
// ============================================================================

#[test]
fn test_plain_news_content_object() {
    let doc = json!({
        "news_content": format!("**Group: NewsA**\n[2024-01-01 09:00:00] {}", padded("Hello"))
    });
    let records = load_records(&doc, &RecordSchema::default()).unwrap();
    assert_eq!(records.len(), 1);

    let outcome = Transformer::with_excluded_groups::<_, &str>([]).process(records);
    assert_eq!(outcome.report.messages[0].group, "NewsA");
    assert_eq!(outcome.report.messages[0].timestamp_iso, "2024-01-01T09:00:00Z");
}

#[test]
fn test_result_body_as_object() {
    let doc = json!({
        "result": { "body": { "news_content": "**Group: G**\n[2024-01-01 09:00:00] hi" } }
    });
    let records = load_records(&doc, &RecordSchema::default()).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_envelope_without_body_is_structural_error() {
    let doc = json!({ "result": { "statusCode": 500 } });
    let err = load_records(&doc, &RecordSchema::default()).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_undecodable_body_is_structural_error() {
    let doc = json!([{ "result": { "body": "{not json" } }]);
    let err = load_records(&doc, &RecordSchema::default()).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("body"));
}

#[test]
fn test_invalid_json_file_is_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"group\": ").unwrap();

    let err = load_file(&path, &RecordSchema::default()).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_file("/definitely/not/here.json", &RecordSchema::default()).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_digest_stamp_does_not_count_toward_length() {
    let body = "x".repeat(90);
    let content = format!("**Group: NewsA**\n[2024-01-01 09:00:00] {body}");
    assert!(content.lines().nth(1).unwrap().chars().count() > 100);

    let doc = json!({ "news_content": content });
    let records = load_records(&doc, &RecordSchema::default()).unwrap();
    let outcome = Transformer::with_excluded_groups::<_, &str>([]).process(records);

    assert_eq!(outcome.stats.too_short, 1);
    assert!(outcome.report.is_empty());
}
