//! Document store trait definition.

use crate::error::{StorageError, StorageResult};
use std::fmt::Debug;

/// A low-level document store for JsonDB.
///
/// Document stores are **opaque text maps** keyed by document name. JsonDB
/// owns the format of the documents - stores do not parse JSON, compute
/// fingerprints, or know about collections.
///
/// # Invariants
///
/// - `write` replaces the whole document; a later `read` returns exactly
///   the text written
/// - `read` of a document that was never written returns `Ok(None)`
/// - `exists` agrees with `read` returning `Some`
/// - Stores must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::FileStore`] - For persistent storage
/// - [`super::InMemoryStore`] - For testing
pub trait DocumentStore: Send + Sync + Debug {
    /// Returns true if a document with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the check itself fails.
    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Reads the full text of a document.
    ///
    /// Returns `None` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is invalid
    /// - The document is not valid UTF-8
    /// - An I/O error occurs
    fn read(&self, name: &str) -> StorageResult<Option<String>>;

    /// Writes the full text of a document, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or an I/O error occurs.
    fn write(&self, name: &str, contents: &str) -> StorageResult<()>;
}

/// Checks that a document name can be used as a file stem.
///
/// Names must be non-empty, must not be `.` or `..`, and must not contain
/// path separators or NUL bytes.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] describing the first violation.
pub fn validate_document_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::invalid_name(name, "name is empty"));
    }
    if name == "." || name == ".." {
        return Err(StorageError::invalid_name(name, "name is a relative path"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_name(
            name,
            "name contains a path separator or NUL",
        ));
    }
    Ok(())
}
