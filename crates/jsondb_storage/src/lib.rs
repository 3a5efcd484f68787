//! # JsonDB Storage
//!
//! Document store trait and implementations for JsonDB.
//!
//! This crate provides the lowest-level storage abstraction for JsonDB.
//! Stores hold **whole named documents** as text - they do not interpret
//! the documents they store.
//!
//! ## Design Principles
//!
//! - Stores are simple document maps (exists, read, write)
//! - A write always replaces the whole document; there is no append
//! - No knowledge of collections, checkpoints, or fingerprints
//! - Must be `Send + Sync` so a context can be moved between threads
//!
//! ## Available Stores
//!
//! - [`FileStore`] - One `<name>.<ext>` file per document in a directory
//! - [`InMemoryStore`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use jsondb_storage::{DocumentStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.write("users", "[]").unwrap();
//! assert_eq!(store.read("users").unwrap().as_deref(), Some("[]"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::{validate_document_name, DocumentStore};
pub use error::{StorageError, StorageResult};
pub use file::{FileStore, DEFAULT_EXTENSION};
pub use memory::InMemoryStore;
