//! JSON decoder.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;

/// Decode a sequence of records from JSON text.
///
/// Accepts any JSON array whose elements deserialize as `T`; canonical
/// formatting is not required on input.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the text is not valid JSON,
/// is not an array, or an element does not match `T`.
pub fn from_json<T: DeserializeOwned>(text: &str) -> CodecResult<Vec<T>> {
    serde_json::from_str(text).map_err(|e| CodecError::DecodingFailed {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
    })
}
