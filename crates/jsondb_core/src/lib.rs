//! # JsonDB Core
//!
//! Collection registry and commit/rollback engine for JsonDB.
//!
//! This crate provides:
//! - [`Collection<T>`]: shared, ordered, mutable record sequences
//! - [`Context`]: owns named collections and their checkpoints
//! - Commit: in-memory snapshots, or fingerprint-checked JSON documents
//! - Rollback: restore every collection to its last checkpoint
//!
//! ## Example
//!
//! ```rust
//! use jsondb_core::{Collection, Context};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Task {
//!     title: String,
//!     done: bool,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let tasks: Collection<Task> = Collection::new();
//! let mut ctx = Context::builder()
//!     .location(dir.path())
//!     .register("tasks", &tasks)
//!     .build()
//!     .unwrap();
//!
//! tasks.push(Task { title: "write docs".into(), done: false });
//! ctx.commit().unwrap();
//! assert!(dir.path().join("tasks.json").exists());
//!
//! let open: Vec<Task> = tasks.filter(|t| !t.done);
//! assert_eq!(open.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod checkpoint;
mod collection;
mod config;
mod context;
mod error;
mod mode;
mod registry;

pub use checkpoint::{Checkpoint, CheckpointStore, Snapshot};
pub use collection::{Collection, Record};
pub use config::Config;
pub use context::{CommitReport, Context, ContextBuilder};
pub use error::{CollectionFailure, CoreError, CoreResult};
pub use mode::PersistenceMode;
pub use registry::{CollectionRegistry, CollectionSlot};

pub use jsondb_codec::Fingerprint;
pub use jsondb_storage::{DocumentStore, FileStore, InMemoryStore};
