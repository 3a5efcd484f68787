//! Test fixtures and context helpers.
//!
//! Provides a sample record type and convenience constructors for contexts
//! in each persistence mode.

use jsondb_core::{Collection, Context, InMemoryStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Name under which [`TestContext`] registers its collection.
pub const TEST_OBJECTS: &str = "TestObjects";

/// A sample record with address-like fields.
///
/// Field names serialize in PascalCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TestObject {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
}

impl TestObject {
    /// Creates an object with only a name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Creates an object with a name and a city.
    pub fn in_city(name: &str, city: &str) -> Self {
        Self {
            name: name.to_string(),
            city: city.to_string(),
            ..Self::default()
        }
    }
}

/// A temporary directory that is removed on drop.
#[derive(Debug)]
pub struct TempLocation {
    dir: TempDir,
}

impl TempLocation {
    /// Creates a fresh empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the path of the `TestObjects` document.
    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join(format!("{TEST_OBJECTS}.json"))
    }

    /// Reads the `TestObjects` document, if it exists.
    pub fn read_document(&self) -> Option<String> {
        std::fs::read_to_string(self.document_path()).ok()
    }
}

impl Default for TempLocation {
    fn default() -> Self {
        Self::new()
    }
}

/// A context with one registered `TestObjects` collection.
pub struct TestContext {
    /// The context instance.
    pub ctx: Context,
    /// Live handle to the `TestObjects` collection.
    pub objects: Collection<TestObject>,
    /// The temporary directory (kept alive to prevent cleanup).
    _location: Option<TempLocation>,
}

impl TestContext {
    /// Creates an in-memory context with an empty collection.
    pub fn in_memory() -> Self {
        Self::with_objects(Vec::new())
    }

    /// Creates an in-memory context with a pre-filled collection.
    pub fn with_objects(objects: Vec<TestObject>) -> Self {
        let objects = Collection::from(objects);
        let ctx = Context::builder()
            .register(TEST_OBJECTS, &objects)
            .build()
            .expect("Failed to build in-memory context");
        Self {
            ctx,
            objects,
            _location: None,
        }
    }

    /// Creates a file-backed context in a fresh temporary directory.
    pub fn file() -> Self {
        let location = TempLocation::new();
        let mut fixture = Self::at(location.path());
        fixture._location = Some(location);
        fixture
    }

    /// Creates a file-backed context over an existing directory.
    ///
    /// The directory is not owned; use this to reopen a location.
    pub fn at(path: &Path) -> Self {
        let objects = Collection::new();
        let ctx = Context::builder()
            .location(path)
            .register(TEST_OBJECTS, &objects)
            .build()
            .expect("Failed to build file-backed context");
        Self {
            ctx,
            objects,
            _location: None,
        }
    }

    /// Creates a context with file-backed semantics over an in-memory store.
    pub fn over_store(store: Arc<InMemoryStore>) -> Self {
        let objects = Collection::new();
        let ctx = Context::builder()
            .store(store)
            .register(TEST_OBJECTS, &objects)
            .build()
            .expect("Failed to build store-backed context");
        Self {
            ctx,
            objects,
            _location: None,
        }
    }

    /// Opens a second context over the same directory.
    ///
    /// # Panics
    ///
    /// Panics if this context is not backed by a directory.
    pub fn reopen(&self) -> Self {
        let path = self
            .ctx
            .location()
            .expect("Only directory-backed contexts can be reopened");
        Self::at(path)
    }

    /// Returns the directory if file-backed, None otherwise.
    pub fn path(&self) -> Option<&Path> {
        self.ctx.location()
    }

    /// Returns the names of all objects, in order.
    pub fn names(&self) -> Vec<String> {
        self.objects.read().iter().map(|o| o.name.clone()).collect()
    }
}

impl std::ops::Deref for TestContext {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl std::ops::DerefMut for TestContext {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

/// Runs a test with a temporary in-memory context.
pub fn with_memory_context<F, R>(f: F) -> R
where
    F: FnOnce(&mut Context, &Collection<TestObject>) -> R,
{
    let mut fixture = TestContext::in_memory();
    f(&mut fixture.ctx, &fixture.objects)
}

/// Runs a test with a temporary file-backed context.
pub fn with_file_context<F, R>(f: F) -> R
where
    F: FnOnce(&mut Context, &Collection<TestObject>, &Path) -> R,
{
    let mut fixture = TestContext::file();
    let path = fixture
        .path()
        .expect("File context should have a path")
        .to_path_buf();
    f(&mut fixture.ctx, &fixture.objects, &path)
}
