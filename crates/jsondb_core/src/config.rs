//! Context configuration.

use jsondb_storage::DEFAULT_EXTENSION;
use std::path::{Path, PathBuf};

/// Configuration for building a context.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one document per collection.
    ///
    /// `None` selects in-memory mode.
    pub location: Option<PathBuf>,

    /// File extension of collection documents, without the dot.
    pub extension: String,

    /// Whether to fsync every document written by a commit.
    pub sync_on_commit: bool,

    /// Whether to write documents through a temp file and rename.
    pub atomic_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: None,
            extension: DEFAULT_EXTENSION.to_string(),
            sync_on_commit: true,
            atomic_writes: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage directory, selecting file-backed mode.
    #[must_use]
    pub fn location(mut self, path: impl AsRef<Path>) -> Self {
        self.location = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the document file extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets whether to fsync documents on commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets whether to write documents atomically.
    #[must_use]
    pub const fn atomic_writes(mut self, value: bool) -> Self {
        self.atomic_writes = value;
        self
    }
}
