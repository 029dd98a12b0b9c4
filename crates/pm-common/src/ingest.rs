//! Boundary between raw API payloads and the engine's records.
//!
//! Populations fetched from the panel API can contain `null` holes or
//! entries that are not objects; those are dropped here so scoring never
//! sees them.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::habits::HabitsRecord;
use crate::Volunteer;

/// Numeric ids, possibly sent as strings.
pub fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Keeps non-blank strings and stringifies numbers (phototypes are sometimes
/// sent as `3`). Everything else reads as missing.
pub fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First usable id among `keys`, in order.
pub fn first_id(map: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| map.get(*key).and_then(id_from_value))
}

/// First usable string among `keys`, in order.
pub fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(string_from_value))
}

fn entries<'a>(value: &'a Value, what: &'static str) -> &'a [Value] {
    match value {
        Value::Array(items) => items,
        Value::Null => &[],
        other => {
            warn!(kind = what, found = %json_kind(other), "expected a JSON array; ignoring payload");
            &[]
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Volunteers from a raw JSON array, skipping null and non-object entries.
pub fn volunteers_from_value(value: &Value) -> Vec<Volunteer> {
    entries(value, "volunteers")
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => Some(Volunteer::from_json_map(map)),
            other => {
                debug!(index, found = json_kind(other), "skipping malformed volunteer entry");
                None
            }
        })
        .collect()
}

/// Habits records from a raw JSON array, skipping null and non-object entries.
pub fn habits_from_value(value: &Value) -> Vec<HabitsRecord> {
    entries(value, "habits")
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => Some(HabitsRecord::from_json_map(map)),
            other => {
                debug!(index, found = json_kind(other), "skipping malformed habits entry");
                None
            }
        })
        .collect()
}
