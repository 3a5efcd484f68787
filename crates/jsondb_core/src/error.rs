//! Error types for JsonDB core.

use jsondb_codec::CodecError;
use jsondb_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in JsonDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The storage location is missing or is not a directory.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// A collection declaration is duplicated or invalid.
    #[error("registration error for collection {name:?}: {reason}")]
    Registration {
        /// The offending collection name.
        name: String,
        /// Why the registration was rejected.
        reason: String,
    },

    /// A collection could not be encoded, or its stored document decoded.
    #[error("serialization error in collection {collection}: {source}")]
    Serialization {
        /// The collection being encoded or decoded.
        collection: String,
        /// The underlying codec error.
        #[source]
        source: CodecError,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// One or more collections failed to commit.
    ///
    /// Every collection was attempted; the ones listed here were not made
    /// durable, all others were.
    #[error("commit failed for {}: {}", .failures.len(), failure_names(.failures))]
    Commit {
        /// Per-collection failures, in registration order.
        failures: Vec<CollectionFailure>,
    },

    /// One or more collections failed to roll back.
    ///
    /// Failed collections are left empty.
    #[error("rollback failed for {}: {}", .failures.len(), failure_names(.failures))]
    Rollback {
        /// Per-collection failures, in registration order.
        failures: Vec<CollectionFailure>,
    },
}

/// A failure confined to a single collection during commit or rollback.
#[derive(Debug, Error)]
#[error("collection {collection}: {source}")]
pub struct CollectionFailure {
    /// The collection that failed.
    pub collection: String,
    /// What went wrong.
    #[source]
    pub source: CoreError,
}

fn failure_names(failures: &[CollectionFailure]) -> String {
    failures
        .iter()
        .map(|f| f.collection.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a registration error.
    pub fn registration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Registration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a serialization error for a collection.
    pub fn serialization(collection: impl Into<String>, source: CodecError) -> Self {
        Self::Serialization {
            collection: collection.into(),
            source,
        }
    }

    /// Returns the per-collection failures of a commit or rollback error.
    #[must_use]
    pub fn failures(&self) -> &[CollectionFailure] {
        match self {
            Self::Commit { failures } | Self::Rollback { failures } => failures,
            _ => &[],
        }
    }
}
