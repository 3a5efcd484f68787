//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store location is missing or is not a directory.
    #[error("invalid store location {}: {reason}", path.display())]
    InvalidLocation {
        /// The rejected location.
        path: PathBuf,
        /// Why the location was rejected.
        reason: String,
    },

    /// The document name cannot be used as a file stem.
    #[error("invalid document name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// A document is not valid UTF-8 text.
    #[error("document {name} is not valid UTF-8")]
    NotUtf8 {
        /// The document name.
        name: String,
    },
}

impl StorageError {
    /// Creates an invalid location error.
    pub fn invalid_location(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
