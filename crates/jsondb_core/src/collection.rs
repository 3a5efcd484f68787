//! Live collection handles.
//!
//! A [`Collection<T>`] is a shared, ordered, mutable `Vec<T>`. Cloning the
//! handle does not copy the records: every clone sees the same sequence, so
//! the handle kept by the application and the one held by the context's
//! registry always agree.
//!
//! # Language-Native Querying
//!
//! JsonDB has no query language. Filter with iterator adapters:
//!
//! ```rust
//! use jsondb_core::Collection;
//!
//! let numbers = Collection::from(vec![1, 5, 10, 15]);
//! let big: Vec<i32> = numbers.filter(|n| *n > 7);
//! assert_eq!(big, vec![10, 15]);
//!
//! let total: i32 = numbers.read().iter().sum();
//! assert_eq!(total, 31);
//! ```

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A value that can be stored in a collection.
///
/// Blanket-implemented for every type that can round-trip through JSON and
/// be deep-copied.
///
/// In-memory checkpoints are taken with [`Clone`], not through JSON, so
/// `Clone` must be a deep copy. Fields marked `#[serde(skip)]` survive an
/// in-memory rollback but are reset to their default by a file-backed one.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// A shared handle to an ordered sequence of records.
pub struct Collection<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> Collection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if the collection has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Appends a record.
    pub fn push(&self, item: T) {
        self.items.write().push(item);
    }

    /// Inserts a record at `index`, shifting later records.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, item: T) {
        self.items.write().insert(index, item);
    }

    /// Removes and returns the record at `index`, or `None` if out of range.
    pub fn remove(&self, index: usize) -> Option<T> {
        let mut items = self.items.write();
        (index < items.len()).then(|| items.remove(index))
    }

    /// Removes every record for which `keep` returns false.
    pub fn retain<F: FnMut(&T) -> bool>(&self, keep: F) {
        self.items.write().retain(keep);
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Appends all records from an iterator.
    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) {
        self.items.write().extend(items);
    }

    /// Replaces the whole sequence.
    pub fn replace(&self, items: Vec<T>) {
        *self.items.write() = items;
    }

    /// Locks the sequence for reading.
    ///
    /// Do not call mutating methods on any handle of this collection while
    /// the guard is alive.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.items.read()
    }

    /// Locks the sequence for in-place mutation.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.items.write()
    }

    /// Returns true if both handles point at the same sequence.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<T: Clone> Collection<T> {
    /// Returns a copy of the record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Returns a copy of the first record matching `predicate`.
    #[must_use]
    pub fn find<P: FnMut(&T) -> bool>(&self, mut predicate: P) -> Option<T> {
        self.items.read().iter().find(|item| predicate(item)).cloned()
    }

    /// Returns copies of every record matching `predicate`, in order.
    ///
    /// **Warning**: This is a linear scan.
    #[must_use]
    pub fn filter<P: FnMut(&T) -> bool>(&self, mut predicate: P) -> Vec<T> {
        self.items
            .read()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Returns a deep copy of the whole sequence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.read().clone()
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.read().iter()).finish()
    }
}
