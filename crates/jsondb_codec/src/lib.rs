//! # JsonDB Codec
//!
//! Canonical JSON encoding/decoding and content fingerprints for JsonDB.
//!
//! This crate provides deterministic JSON encoding that ensures:
//! - Identical record sequences produce identical text
//! - Stable output across runs and processes
//! - Stable fingerprints for change detection
//!
//! ## Canonical JSON Rules
//!
//! - The document is a JSON array, one element per record, in order
//! - Object keys are sorted (bytewise), including keys of nested maps
//! - Two-space indentation, `\n` line endings, no trailing newline
//! - An empty sequence encodes as `[]`
//!
//! ## Usage
//!
//! ```
//! use jsondb_codec::{from_json, to_canonical_json, Fingerprint};
//!
//! let records = vec!["a".to_string(), "b".to_string()];
//! let text = to_canonical_json(&records).unwrap();
//! let decoded: Vec<String> = from_json(&text).unwrap();
//! assert_eq!(records, decoded);
//!
//! assert_eq!(Fingerprint::of(&text), Fingerprint::of(&text));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod fingerprint;

pub use decoder::from_json;
pub use encoder::to_canonical_json;
pub use error::{CodecError, CodecResult};
pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
