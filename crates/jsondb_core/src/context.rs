//! Context facade and the commit/rollback engine.

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::collection::{Collection, Record};
use crate::config::Config;
use crate::error::{CollectionFailure, CoreError, CoreResult};
use crate::mode::PersistenceMode;
use crate::registry::{CollectionRegistry, CollectionSlot};
use jsondb_codec::Fingerprint;
use jsondb_storage::DocumentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The outcome of a successful [`Context::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Collections whose document was (re)written.
    pub written: Vec<String>,
    /// Collections whose document was already up to date and was skipped.
    pub unchanged: Vec<String>,
    /// Collections re-snapshotted in memory (in-memory mode only).
    pub snapshotted: Vec<String>,
}

impl CommitReport {
    /// Returns true if the commit wrote nothing to storage.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }
}

/// Builds a [`Context`] from a configuration and a set of collections.
///
/// Registration errors are held until [`ContextBuilder::build`], so
/// registrations can be chained.
///
/// # Example
///
/// ```rust
/// use jsondb_core::{Collection, Context};
///
/// let names: Collection<String> = Collection::new();
/// let mut ctx = Context::builder()
///     .register("names", &names)
///     .build()
///     .unwrap();
///
/// names.push("Original".to_string());
/// ctx.commit().unwrap();
/// names.push("New".to_string());
/// ctx.rollback().unwrap();
/// assert_eq!(names.to_vec(), vec!["Original"]);
/// ```
#[derive(Default)]
pub struct ContextBuilder {
    config: Config,
    store: Option<Arc<dyn DocumentStore>>,
    registry: CollectionRegistry,
    error: Option<CoreError>,
}

impl ContextBuilder {
    /// Creates a builder for an in-memory context with no collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the storage directory, selecting file-backed mode.
    #[must_use]
    pub fn location(mut self, path: impl AsRef<Path>) -> Self {
        self.config = self.config.location(path);
        self
    }

    /// Uses `store` for file-backed semantics instead of a directory.
    ///
    /// Takes precedence over a configured location.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Declares a collection under `name`.
    ///
    /// A pre-filled collection is adopted as-is (in file-backed mode, its
    /// content is replaced if a document for it exists).
    #[must_use]
    pub fn register<T: Record>(mut self, name: &str, collection: &Collection<T>) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.registry.register(name, collection) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Resolves the persistence mode and loads or snapshots every collection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The location is missing or not a directory (`Configuration`)
    /// - A collection name was duplicated or invalid (`Registration`)
    /// - A stored document cannot be read (`Storage`) or decoded
    ///   (`Serialization`)
    pub fn build(self) -> CoreResult<Context> {
        let mode = match self.store {
            Some(store) => PersistenceMode::with_store(store),
            None => PersistenceMode::resolve(&self.config)?,
        };
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut checkpoints = CheckpointStore::new();
        match &mode {
            PersistenceMode::InMemory => snapshot_all(&self.registry, &mut checkpoints),
            PersistenceMode::FileBacked { store, .. } => {
                for slot in self.registry.iter() {
                    load_collection(store.as_ref(), slot, &mut checkpoints)?;
                }
            }
        }

        info!(
            collections = self.registry.len(),
            in_memory = mode.is_in_memory(),
            "context ready"
        );

        Ok(Context {
            config: self.config,
            mode,
            registry: self.registry,
            checkpoints,
        })
    }
}

/// An embedded document store with commit/rollback checkpoints.
///
/// A context owns a fixed set of named collections. Callers mutate the
/// collections freely through their [`Collection`] handles, then call
/// [`Context::commit`] to make the current state the new checkpoint, or
/// [`Context::rollback`] to return every collection to its checkpoint.
///
/// # Persistence Modes
///
/// - **In-memory** (no location): checkpoints are private deep copies; no I/O.
/// - **File-backed** (location or store): each collection is a JSON document
///   `<location>/<name>.json`. Commit rewrites only documents whose
///   fingerprint changed; rollback re-reads documents from storage.
///
/// # Concurrency
///
/// A context is meant to be a single long-lived instance owned by the
/// application. It provides no cross-process locking and no atomicity across
/// collections: each collection's document is an independent unit of
/// durability. Callers sharing a context between threads must serialize
/// `commit`/`rollback` with their own mutations.
#[derive(Debug)]
pub struct Context {
    config: Config,
    mode: PersistenceMode,
    registry: CollectionRegistry,
    checkpoints: CheckpointStore,
}

impl Context {
    /// Returns a builder for a new context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Makes the current state of every collection its checkpoint.
    ///
    /// In file-backed mode every collection is attempted even if an earlier
    /// one fails; a collection whose canonical document is unchanged is not
    /// rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Commit`] listing every collection that could not
    /// be encoded or written. Collections not listed were committed.
    pub fn commit(&mut self) -> CoreResult<CommitReport> {
        match &self.mode {
            PersistenceMode::InMemory => {
                snapshot_all(&self.registry, &mut self.checkpoints);
                Ok(CommitReport {
                    snapshotted: self.registry.names().map(str::to_string).collect(),
                    ..CommitReport::default()
                })
            }
            PersistenceMode::FileBacked { store, .. } => {
                commit_all(store.as_ref(), &self.registry, &mut self.checkpoints)
            }
        }
    }

    /// Returns every collection to its checkpoint.
    ///
    /// In file-backed mode each collection is cleared and then reloaded from
    /// its stored document, which is read again rather than taken from a
    /// cache. A collection with no document is left empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Rollback`] listing every collection whose
    /// document could not be read or decoded; those collections are empty.
    pub fn rollback(&mut self) -> CoreResult<()> {
        match &self.mode {
            PersistenceMode::InMemory => {
                restore_all(&self.registry, &self.checkpoints);
                Ok(())
            }
            PersistenceMode::FileBacked { store, .. } => {
                reload_all(store.as_ref(), &self.registry, &mut self.checkpoints)
            }
        }
    }

    /// Returns the live handle of a collection.
    ///
    /// Returns `None` if no collection has this name or its record type is
    /// not `T`.
    #[must_use]
    pub fn collection<T: Record>(&self, name: &str) -> Option<Collection<T>> {
        self.registry.get(name)
    }

    /// Iterates over collection names in registration order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    /// Returns the number of records in a collection.
    #[must_use]
    pub fn len_of(&self, name: &str) -> Option<usize> {
        self.registry.slot(name).map(|s| s.len())
    }

    /// Returns the registry of collections.
    #[must_use]
    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Returns the checkpoint recorded for a collection.
    #[must_use]
    pub fn checkpoint(&self, name: &str) -> Option<&Checkpoint> {
        self.checkpoints.get(name)
    }

    /// Returns the fingerprint recorded for a collection (file-backed mode).
    #[must_use]
    pub fn fingerprint(&self, name: &str) -> Option<Fingerprint> {
        self.checkpoints.fingerprint(name)
    }

    /// Returns true if nothing is persisted.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.mode.is_in_memory()
    }

    /// Returns the storage directory, if the context is backed by one.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        match &self.mode {
            PersistenceMode::FileBacked { location, .. } => location.as_deref(),
            PersistenceMode::InMemory => None,
        }
    }

    /// Returns the path of a collection's document, if backed by a directory.
    #[must_use]
    pub fn document_path(&self, name: &str) -> Option<PathBuf> {
        let location = self.location()?;
        self.registry
            .contains(name)
            .then(|| location.join(format!("{name}.{}", self.config.extension)))
    }

    /// Returns the configuration the context was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the persistence mode.
    #[must_use]
    pub fn mode(&self) -> &PersistenceMode {
        &self.mode
    }
}

fn snapshot_all(registry: &CollectionRegistry, checkpoints: &mut CheckpointStore) {
    for slot in registry.iter() {
        checkpoints.set(slot.name(), Checkpoint::Snapshot(slot.snapshot()));
    }
}

fn restore_all(registry: &CollectionRegistry, checkpoints: &CheckpointStore) {
    for slot in registry.iter() {
        match checkpoints.snapshot(slot.name()) {
            Some(snapshot) => {
                if !slot.restore(snapshot) {
                    warn!(collection = slot.name(), "snapshot type mismatch, clearing");
                    slot.clear();
                }
            }
            None => slot.clear(),
        }
    }
}

/// Loads one collection from its document, if there is one.
///
/// The fingerprint of the text read becomes the checkpoint before decoding,
/// so a later commit compares against what is actually stored.
fn load_collection(
    store: &dyn DocumentStore,
    slot: &dyn CollectionSlot,
    checkpoints: &mut CheckpointStore,
) -> CoreResult<()> {
    let name = slot.name();
    let Some(text) = store.read(name)? else {
        debug!(collection = name, "no document, keeping current records");
        return Ok(());
    };

    let fingerprint = Fingerprint::of(&text);
    checkpoints.set(name, Checkpoint::Fingerprint(fingerprint));
    let count = slot
        .replace_from_json(&text)
        .map_err(|e| CoreError::serialization(name, e))?;

    debug!(collection = name, records = count, %fingerprint, "loaded document");
    Ok(())
}

fn reload_all(
    store: &dyn DocumentStore,
    registry: &CollectionRegistry,
    checkpoints: &mut CheckpointStore,
) -> CoreResult<()> {
    for slot in registry.iter() {
        slot.clear();
    }

    let mut failures = Vec::new();
    for slot in registry.iter() {
        if let Err(e) = load_collection(store, slot, checkpoints) {
            warn!(collection = slot.name(), error = %e, "rollback failed");
            failures.push(CollectionFailure {
                collection: slot.name().to_string(),
                source: e,
            });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Rollback { failures })
    }
}

/// Writes one collection if its canonical document changed.
///
/// Returns true if the document was written.
fn commit_collection(
    store: &dyn DocumentStore,
    slot: &dyn CollectionSlot,
    checkpoints: &mut CheckpointStore,
) -> CoreResult<bool> {
    let name = slot.name();
    let text = slot
        .to_json()
        .map_err(|e| CoreError::serialization(name, e))?;
    let fingerprint = Fingerprint::of(&text);

    if checkpoints.fingerprint(name) == Some(fingerprint) && store.exists(name)? {
        debug!(collection = name, %fingerprint, "unchanged, skipping write");
        return Ok(false);
    }

    store.write(name, &text)?;
    checkpoints.set(name, Checkpoint::Fingerprint(fingerprint));
    debug!(collection = name, records = slot.len(), %fingerprint, "wrote document");
    Ok(true)
}

fn commit_all(
    store: &dyn DocumentStore,
    registry: &CollectionRegistry,
    checkpoints: &mut CheckpointStore,
) -> CoreResult<CommitReport> {
    let mut report = CommitReport::default();
    let mut failures = Vec::new();

    for slot in registry.iter() {
        match commit_collection(store, slot, checkpoints) {
            Ok(true) => report.written.push(slot.name().to_string()),
            Ok(false) => report.unchanged.push(slot.name().to_string()),
            Err(e) => {
                warn!(collection = slot.name(), error = %e, "commit failed");
                failures.push(CollectionFailure {
                    collection: slot.name().to_string(),
                    source: e,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(CoreError::Commit { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_storage::InMemoryStore;
    use serde::{Deserialize, Serialize};
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
    }

    fn note(title: &str) -> Note {
        Note {
            title: title.to_string(),
        }
    }

    #[test]
    fn in_memory_commit_and_rollback() {
        let notes: Collection<Note> = Collection::new();
        let mut ctx = Context::builder().register("notes", &notes).build().unwrap();
        assert!(ctx.is_in_memory());
        assert!(ctx.location().is_none());

        notes.push(note("Original"));
        let report = ctx.commit().unwrap();
        assert_eq!(report.snapshotted, vec!["notes"]);
        assert!(report.is_noop());

        notes.push(note("New"));
        assert_eq!(notes.len(), 2);

        ctx.rollback().unwrap();
        assert_eq!(notes.to_vec(), vec![note("Original")]);
    }

    #[test]
    fn in_memory_rollback_without_commit_restores_prefill() {
        let notes = Collection::from(vec![note("Seed")]);
        let mut ctx = Context::builder().register("notes", &notes).build().unwrap();

        notes.clear();
        notes.push(note("Other"));
        ctx.rollback().unwrap();

        assert_eq!(notes.to_vec(), vec![note("Seed")]);
    }

    #[test]
    fn checkpoint_is_not_aliased() {
        let notes = Collection::from(vec![note("Seed")]);
        let mut ctx = Context::builder().register("notes", &notes).build().unwrap();

        notes.write()[0].title = "Mutated".into();
        ctx.rollback().unwrap();
        notes.write()[0].title = "Mutated again".into();
        ctx.rollback().unwrap();

        assert_eq!(notes.to_vec(), vec![note("Seed")]);
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Draft {
        title: String,
        #[serde(skip)]
        cursor: usize,
    }

    #[test]
    fn skipped_fields_follow_the_checkpoint_kind() {
        let draft = Draft {
            title: "a".into(),
            cursor: 7,
        };

        let drafts = Collection::from(vec![draft.clone()]);
        let mut ctx = Context::builder().register("drafts", &drafts).build().unwrap();
        drafts.clear();
        ctx.rollback().unwrap();
        assert_eq!(drafts.to_vec(), vec![draft.clone()]);

        let store = Arc::new(InMemoryStore::new());
        let drafts = Collection::from(vec![draft]);
        let mut ctx = Context::builder()
            .store(store)
            .register("drafts", &drafts)
            .build()
            .unwrap();
        ctx.commit().unwrap();
        ctx.rollback().unwrap();
        assert_eq!(drafts.get(0).map(|d| d.cursor), Some(0));
    }

    #[test]
    fn registration_error_surfaces_at_build() {
        let result = Context::builder()
            .register("notes", &Collection::<Note>::new())
            .register("notes", &Collection::<Note>::new())
            .build();
        assert!(matches!(result, Err(CoreError::Registration { .. })));
    }

    #[test]
    fn missing_location_fails_build() {
        let dir = tempdir().unwrap();
        let result = Context::builder()
            .location(dir.path().join("missing"))
            .register("notes", &Collection::<Note>::new())
            .build();
        assert!(matches!(result, Err(CoreError::Configuration { .. })));
    }

    #[test]
    fn typed_lookup() {
        let notes: Collection<Note> = Collection::new();
        let ctx = Context::builder().register("notes", &notes).build().unwrap();

        let live = ctx.collection::<Note>("notes").unwrap();
        live.push(note("via lookup"));
        assert_eq!(notes.len(), 1);
        assert_eq!(ctx.len_of("notes"), Some(1));
        assert!(ctx.collection::<String>("notes").is_none());
        assert_eq!(ctx.collection_names().collect::<Vec<_>>(), vec!["notes"]);
    }

    #[test]
    fn store_commit_skips_unchanged() {
        let store = Arc::new(InMemoryStore::new());
        let notes: Collection<Note> = Collection::new();
        let mut ctx = Context::builder()
            .store(store.clone())
            .register("notes", &notes)
            .build()
            .unwrap();

        notes.push(note("a"));
        let first = ctx.commit().unwrap();
        assert_eq!(first.written, vec!["notes"]);

        let second = ctx.commit().unwrap();
        assert_eq!(second.unchanged, vec!["notes"]);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn store_rollback_reloads_document() {
        let store = Arc::new(InMemoryStore::new());
        let notes: Collection<Note> = Collection::new();
        let mut ctx = Context::builder()
            .store(store.clone())
            .register("notes", &notes)
            .build()
            .unwrap();

        notes.push(note("Initial"));
        ctx.commit().unwrap();
        notes.push(note("Modified"));
        ctx.rollback().unwrap();

        assert_eq!(notes.to_vec(), vec![note("Initial")]);
    }

    #[test]
    fn document_path_uses_extension() {
        let dir = tempdir().unwrap();
        let ctx = Context::builder()
            .config(Config::new().location(dir.path()).extension("db"))
            .register("notes", &Collection::<Note>::new())
            .build()
            .unwrap();

        assert_eq!(
            ctx.document_path("notes"),
            Some(dir.path().join("notes.db"))
        );
        assert!(ctx.document_path("other").is_none());
        assert_eq!(ctx.location(), Some(dir.path()));
    }
}
