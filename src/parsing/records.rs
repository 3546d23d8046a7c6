//! Decoding of JSON record arrays.
//!
//! Each array element is an object whose field names come from the
//! [`RecordSchema`]. Problems with one element only affect that element:
//! it becomes a [`RecordError`] and the rest of the array is still decoded.

use serde_json::{Map, Value};

use crate::config::RecordSchema;
use crate::core::processor::RecordResult;
use crate::error::RecordError;
use crate::message::RawMessage;

/// Flattens Telegram's `text` field into a plain string.
///
/// The field can be:
/// - A simple string: `"Hello"`
/// - An array with strings and entity objects: `["Read ", {"type": "link", "text": "t.me/x"}]`
///
/// Returns `None` for any other JSON type.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tgbrief::parsing::records::extract_telegram_text;
///
/// let rich = json!(["Check this: ", {"type": "link", "text": "https://example.com"}]);
/// assert_eq!(extract_telegram_text(&rich).as_deref(), Some("Check this: https://example.com"));
/// ```
pub fn extract_telegram_text(text_value: &Value) -> Option<String> {
    match text_value {
        Value::String(s) => Some(s.clone()),
        Value::Array(arr) => Some(
            arr.iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                    _ => None,
                })
                .collect::<String>(),
        ),
        _ => None,
    }
}

/// Decodes one array element.
pub fn decode_record(index: usize, value: &Value, schema: &RecordSchema) -> RecordResult {
    let Value::Object(obj) = value else {
        return Err(RecordError::NotAnObject { index });
    };

    let group = match field(obj, index, &schema.group_field)? {
        Value::String(s) => s.clone(),
        _ => return Err(wrong_type(index, &schema.group_field, "a string")),
    };

    let text = extract_telegram_text(field(obj, index, &schema.text_field)?)
        .ok_or_else(|| wrong_type(index, &schema.text_field, "a string or rich-text array"))?;

    let timestamp = match field(obj, index, &schema.timestamp_field)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(secs) => secs.to_string(),
            None => return Err(wrong_type(index, &schema.timestamp_field, "whole unix seconds")),
        },
        _ => return Err(wrong_type(index, &schema.timestamp_field, "a string or number")),
    };

    Ok(RawMessage {
        group,
        text,
        timestamp,
    })
}

/// Decodes every element of a record array, in order.
pub fn decode_records(items: &[Value], schema: &RecordSchema) -> Vec<RecordResult> {
    items
        .iter()
        .enumerate()
        .map(|(index, value)| decode_record(index, value, schema))
        .collect()
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    index: usize,
    name: &str,
) -> Result<&'a Value, RecordError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(RecordError::MissingField {
            index,
            field: name.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn wrong_type(index: usize, field: &str, expected: &'static str) -> RecordError {
    RecordError::WrongType {
        index,
        field: field.to_string(),
        expected,
    }
}
