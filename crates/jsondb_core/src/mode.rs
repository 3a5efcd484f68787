//! Persistence mode resolution.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use jsondb_storage::{DocumentStore, FileStore, StorageError};
use std::path::PathBuf;
use std::sync::Arc;

/// Where a context keeps its committed state.
#[derive(Debug, Clone)]
pub enum PersistenceMode {
    /// Nothing touches disk; checkpoints are deep copies of each collection.
    InMemory,
    /// Each collection is one document in a store; checkpoints are
    /// fingerprints of the last document written or read.
    FileBacked {
        /// The document store.
        store: Arc<dyn DocumentStore>,
        /// The directory behind the store, if it is a [`FileStore`].
        location: Option<PathBuf>,
    },
}

impl PersistenceMode {
    /// Decides the mode from a configuration.
    ///
    /// No location means in-memory. A location must name an existing
    /// directory; it is never created.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if the location is missing or
    /// is not a directory.
    pub fn resolve(config: &Config) -> CoreResult<Self> {
        let Some(location) = &config.location else {
            return Ok(Self::InMemory);
        };

        let store = FileStore::open(location)
            .map_err(|e| match e {
                StorageError::InvalidLocation { path, reason } => CoreError::configuration(
                    format!("storage location {}: {reason}", path.display()),
                ),
                other => CoreError::Storage(other),
            })?
            .with_extension(config.extension.clone())
            .with_sync(config.sync_on_commit)
            .with_atomic_writes(config.atomic_writes);

        Ok(Self::FileBacked {
            store: Arc::new(store),
            location: Some(location.clone()),
        })
    }

    /// File-backed mode over an arbitrary store.
    #[must_use]
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::FileBacked {
            store,
            location: None,
        }
    }

    /// Returns true for in-memory mode.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::InMemory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_storage::InMemoryStore;
    use tempfile::tempdir;

    #[test]
    fn no_location_is_in_memory() {
        let mode = PersistenceMode::resolve(&Config::default()).unwrap();
        assert!(mode.is_in_memory());
    }

    #[test]
    fn existing_directory_is_file_backed() {
        let dir = tempdir().unwrap();
        let mode = PersistenceMode::resolve(&Config::new().location(dir.path())).unwrap();

        match mode {
            PersistenceMode::FileBacked { location, .. } => {
                assert_eq!(location.as_deref(), Some(dir.path()));
            }
            PersistenceMode::InMemory => panic!("expected file-backed mode"),
        }
    }

    #[test]
    fn missing_directory_is_configuration_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = PersistenceMode::resolve(&Config::new().location(&missing));
        assert!(matches!(result, Err(CoreError::Configuration { .. })));
        assert!(!missing.exists());
    }

    #[test]
    fn file_location_is_configuration_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.json");
        std::fs::write(&file, "[]").unwrap();

        let result = PersistenceMode::resolve(&Config::new().location(&file));
        assert!(matches!(result, Err(CoreError::Configuration { .. })));
    }

    #[test]
    fn explicit_store_is_file_backed() {
        let mode = PersistenceMode::with_store(Arc::new(InMemoryStore::new()));
        assert!(!mode.is_in_memory());
    }
}
