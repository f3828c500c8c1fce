//! Key filtering of `data_encr` payloads.

use serde_json::{Map, Value};

use pnf_model::{DynamicPattern, EncryptedBlob};

/// Filter an encrypted-field payload.
///
/// A key survives when it is listed in `allowed` or matches one of
/// `patterns`; everything else is dropped silently. Output order follows the
/// payload, not the allow-list. Non-object values are returned unchanged.
pub fn filter_encrypted(blob: &Value, allowed: &[String], patterns: &[DynamicPattern]) -> Value {
    match blob {
        Value::Object(entries) => Value::Object(filter_entries(entries, allowed, patterns)),
        other => other.clone(),
    }
}

/// Typed counterpart of [`filter_encrypted`].
pub fn filter_blob(blob: &EncryptedBlob, allowed: &[String], patterns: &[DynamicPattern]) -> Value {
    Value::Object(filter_entries(blob.entries(), allowed, patterns))
}

fn filter_entries(
    entries: &Map<String, Value>,
    allowed: &[String],
    patterns: &[DynamicPattern],
) -> Map<String, Value> {
    entries
        .iter()
        .filter(|(key, _)| is_allowed(key, allowed, patterns))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn is_allowed(key: &str, allowed: &[String], patterns: &[DynamicPattern]) -> bool {
    allowed.iter().any(|candidate| candidate == key)
        || patterns.iter().any(|pattern| pattern.matches(key))
}
