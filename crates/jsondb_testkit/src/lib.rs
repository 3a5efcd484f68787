//! # JsonDB Testkit
//!
//! Test utilities for JsonDB.
//!
//! This crate provides:
//! - Test fixtures: a sample record type, temp directories, ready contexts
//! - Property-based test generators using proptest
//! - Opt-in `tracing` output for tests
//!
//! ## Usage
//!
//! ```rust
//! use jsondb_testkit::prelude::*;
//!
//! let fixture = TestContext::in_memory();
//! fixture.objects.push(TestObject::named("Original"));
//! assert_eq!(fixture.objects.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::init_tracing;
}

pub use fixtures::*;
pub use generators::*;

/// Installs a `tracing` subscriber for tests, filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
