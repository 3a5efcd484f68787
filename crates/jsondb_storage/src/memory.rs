//! In-memory document store for testing.

use crate::backend::{validate_document_name, DocumentStore};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// An in-memory document store.
///
/// This store keeps all documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests that count writes or inject write failures
/// - Ephemeral contexts that want file-backed commit semantics without disk
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use jsondb_storage::{DocumentStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// store.write("users", "[]").unwrap();
/// assert_eq!(store.write_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<BTreeMap<String, String>>,
    failing: RwLock<BTreeSet<String>>,
    writes: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store with pre-existing documents.
    ///
    /// Useful for testing load behavior.
    #[must_use]
    pub fn with_documents<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let documents = documents
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            documents: RwLock::new(documents),
            ..Self::default()
        }
    }

    /// Returns the number of successful writes since creation.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns a copy of a document without going through the trait.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<String> {
        self.documents.read().get(name).cloned()
    }

    /// Replaces a document without counting it as a write.
    ///
    /// Simulates an external process editing the store.
    pub fn put_external(&self, name: &str, contents: &str) {
        self.documents
            .write()
            .insert(name.to_string(), contents.to_string());
    }

    /// Makes every subsequent write of `name` fail with an I/O error.
    pub fn fail_writes_to(&self, name: &str) {
        self.failing.write().insert(name.to_string());
    }

    /// Clears all documents and injected failures.
    pub fn clear(&self) {
        self.documents.write().clear();
        self.failing.write().clear();
    }
}

impl DocumentStore for InMemoryStore {
    fn exists(&self, name: &str) -> StorageResult<bool> {
        validate_document_name(name)?;
        Ok(self.documents.read().contains_key(name))
    }

    fn read(&self, name: &str) -> StorageResult<Option<String>> {
        validate_document_name(name)?;
        Ok(self.documents.read().get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> StorageResult<()> {
        validate_document_name(name)?;
        if self.failing.read().contains(name) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("injected write failure for {name}"),
            )));
        }

        self.documents
            .write()
            .insert(name.to_string(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
