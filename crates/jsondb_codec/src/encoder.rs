//! Canonical JSON encoder.

use crate::error::{CodecError, CodecResult};
use serde::Serialize;
use serde_json::Value;

/// Encode a sequence of records to canonical JSON text.
///
/// Records are first lowered to [`serde_json::Value`], whose object map
/// keeps keys sorted, and then pretty-printed. This makes the output
/// independent of `HashMap` iteration order inside records.
///
/// # Errors
///
/// Returns an error if a record cannot be represented as JSON (e.g., a map
/// with non-string keys).
pub fn to_canonical_json<T: Serialize>(records: &[T]) -> CodecResult<String> {
    let value =
        serde_json::to_value(records).map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    serde_json::to_string_pretty(&sort_keys(value))
        .map_err(|e| CodecError::encoding_failed(e.to_string()))
}

// serde_json's `preserve_order` feature may be switched on by another crate
// in the build; rebuild objects so key order never depends on it.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        other => other,
    }
}
