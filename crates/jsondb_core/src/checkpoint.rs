//! Per-collection checkpoints.
//!
//! A checkpoint is the last state a collection can be rolled back to. Which
//! kind is recorded depends on the persistence mode:
//!
//! - file-backed: the [`Fingerprint`] of the last document written or read,
//!   used to skip rewriting unchanged documents
//! - in-memory: a private deep copy ([`Snapshot`]) of the records

use jsondb_codec::Fingerprint;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A type-erased deep copy of a collection's records.
///
/// Never shared outward: rollback restores from a fresh copy of it, so no
/// later mutation can reach the snapshot.
pub struct Snapshot {
    items: Box<dyn Any + Send + Sync>,
    len: usize,
}

impl Snapshot {
    /// Wraps a copied sequence.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            items: Box::new(items),
            len,
        }
    }

    /// Returns the copied records if they are of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&Vec<T>> {
        self.items.downcast_ref::<Vec<T>>()
    }

    /// Returns the number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("len", &self.len).finish()
    }
}

/// The recorded durable state of one collection.
#[derive(Debug)]
pub enum Checkpoint {
    /// Fingerprint of the collection's document (file-backed mode).
    Fingerprint(Fingerprint),
    /// Deep copy of the collection's records (in-memory mode).
    Snapshot(Snapshot),
}

/// At most one checkpoint per collection name.
#[derive(Debug, Default)]
pub struct CheckpointStore {
    entries: HashMap<String, Checkpoint>,
}

impl CheckpointStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a checkpoint, replacing any previous one for `name`.
    pub fn set(&mut self, name: &str, checkpoint: Checkpoint) {
        self.entries.insert(name.to_string(), checkpoint);
    }

    /// Returns the checkpoint for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Checkpoint> {
        self.entries.get(name)
    }

    /// Returns the recorded fingerprint for `name`, if any.
    #[must_use]
    pub fn fingerprint(&self, name: &str) -> Option<Fingerprint> {
        match self.entries.get(name) {
            Some(Checkpoint::Fingerprint(fp)) => Some(*fp),
            _ => None,
        }
    }

    /// Returns the recorded snapshot for `name`, if any.
    #[must_use]
    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        match self.entries.get(name) {
            Some(Checkpoint::Snapshot(snapshot)) => Some(snapshot),
            _ => None,
        }
    }

    /// Returns the number of recorded checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_previous_checkpoint() {
        let mut store = CheckpointStore::new();
        store.set("users", Checkpoint::Fingerprint(Fingerprint::of("[]")));
        store.set("users", Checkpoint::Fingerprint(Fingerprint::of("[1]")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.fingerprint("users"), Some(Fingerprint::of("[1]")));
    }

    #[test]
    fn snapshot_downcast() {
        let mut store = CheckpointStore::new();
        store.set("users", Checkpoint::Snapshot(Snapshot::new(vec![1u32, 2])));

        let snapshot = store.snapshot("users").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.downcast_ref::<u32>(), Some(&vec![1, 2]));
        assert!(snapshot.downcast_ref::<String>().is_none());
        assert!(store.fingerprint("users").is_none());
    }

    #[test]
    fn missing_entries() {
        let store = CheckpointStore::new();
        assert!(store.is_empty());
        assert!(store.get("users").is_none());
        assert!(store.snapshot("users").is_none());
    }
}
