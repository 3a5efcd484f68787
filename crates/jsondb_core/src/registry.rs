//! Collection registry.
//!
//! Collections are declared explicitly at construction; nothing is discovered
//! at runtime. Each registration captures the record type once, behind the
//! [`CollectionSlot`] capability trait, so the engine can clear, refill,
//! encode and snapshot any collection without knowing its type.

use crate::checkpoint::Snapshot;
use crate::collection::{Collection, Record};
use crate::error::{CoreError, CoreResult};
use jsondb_codec::{from_json, to_canonical_json, CodecResult};
use jsondb_storage::validate_document_name;
use std::any::Any;
use std::fmt;

/// Type-erased operations the engine needs on a registered collection.
pub trait CollectionSlot: Send + Sync {
    /// The collection's unique name.
    fn name(&self) -> &str;

    /// Number of records currently in the collection.
    fn len(&self) -> usize;

    /// Returns true if the collection has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all records.
    fn clear(&self);

    /// Decodes `text` and replaces the collection's records with the result.
    ///
    /// On a decode error the collection is left untouched.
    fn replace_from_json(&self, text: &str) -> CodecResult<usize>;

    /// Encodes the current records canonically.
    fn to_json(&self) -> CodecResult<String>;

    /// Takes a deep copy of the current records.
    fn snapshot(&self) -> Snapshot;

    /// Replaces the current records with a fresh copy of `snapshot`.
    ///
    /// Returns false if the snapshot holds a different record type.
    fn restore(&self, snapshot: &Snapshot) -> bool;

    /// The live [`Collection<T>`] handle, for typed lookup.
    fn as_any(&self) -> &dyn Any;
}

struct TypedSlot<T> {
    name: String,
    collection: Collection<T>,
}

impl<T: Record> CollectionSlot for TypedSlot<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.collection.len()
    }

    fn clear(&self) {
        self.collection.clear();
    }

    fn replace_from_json(&self, text: &str) -> CodecResult<usize> {
        let items: Vec<T> = from_json(text)?;
        let count = items.len();
        self.collection.replace(items);
        Ok(count)
    }

    fn to_json(&self) -> CodecResult<String> {
        let items = self.collection.read();
        to_canonical_json(items.as_slice())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.collection.to_vec())
    }

    fn restore(&self, snapshot: &Snapshot) -> bool {
        match snapshot.downcast_ref::<T>() {
            Some(items) => {
                self.collection.replace(items.clone());
                true
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        &self.collection
    }
}

/// The fixed set of collections owned by a context, in registration order.
#[derive(Default)]
pub struct CollectionRegistry {
    slots: Vec<Box<dyn CollectionSlot>>,
}

impl CollectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection under `name`.
    ///
    /// The registry keeps a clone of the handle, so it adopts whatever the
    /// collection already holds.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Registration`] if the name is already taken or
    /// cannot be used as a document name.
    pub fn register<T: Record>(
        &mut self,
        name: &str,
        collection: &Collection<T>,
    ) -> CoreResult<()> {
        validate_document_name(name).map_err(|e| CoreError::registration(name, e.to_string()))?;
        if self.contains(name) {
            return Err(CoreError::registration(name, "name already registered"));
        }

        self.slots.push(Box::new(TypedSlot {
            name: name.to_string(),
            collection: collection.clone(),
        }));
        Ok(())
    }

    /// Returns true if a collection is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// Returns the slot registered under `name`.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&(dyn CollectionSlot + 'static)> {
        self.slots
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Returns the live handle registered under `name`.
    ///
    /// Returns `None` if no such collection exists or it holds a record
    /// type other than `T`.
    #[must_use]
    pub fn get<T: Record>(&self, name: &str) -> Option<Collection<T>> {
        self.slot(name)?
            .as_any()
            .downcast_ref::<Collection<T>>()
            .cloned()
    }

    /// Iterates over all slots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn CollectionSlot + 'static)> + '_ {
        self.slots.iter().map(|s| s.as_ref())
    }

    /// Iterates over collection names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name())
    }

    /// Returns the number of registered collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no collections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for CollectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|s| (s.name(), s.len())))
            .finish()
    }
}
