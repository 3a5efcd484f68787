//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records and mutation
//! sequences for commit/rollback properties.

use crate::fixtures::TestObject;
use jsondb_core::Collection;
use proptest::prelude::*;

/// Strategy for generating short free-text field values.
pub fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::string::string_regex("[A-Za-z ]{0,16}").expect("Invalid regex"),
        1 => any::<String>(),
    ]
}

/// Strategy for generating test objects.
pub fn test_object_strategy() -> impl Strategy<Value = TestObject> {
    (
        field_strategy(),
        field_strategy(),
        field_strategy(),
        field_strategy(),
        prop::string::string_regex("[0-9]{5}").expect("Invalid regex"),
    )
        .prop_map(|(name, address, city, state, zip_code)| TestObject {
            name,
            address,
            city,
            state,
            zip_code,
        })
}

/// Strategy for generating ordered sequences of test objects.
pub fn test_objects_strategy(max_len: usize) -> impl Strategy<Value = Vec<TestObject>> {
    prop::collection::vec(test_object_strategy(), 0..=max_len)
}

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex")
}

/// A mutation applied to a collection between checkpoints.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Append a record.
    Push(TestObject),
    /// Insert a record at `index % (len + 1)`.
    Insert {
        /// Position hint.
        index: usize,
        /// Record to insert.
        object: TestObject,
    },
    /// Remove the record at `index % len`, if any.
    Remove {
        /// Position hint.
        index: usize,
    },
    /// Rename the record at `index % len`, if any.
    Rename {
        /// Position hint.
        index: usize,
        /// New name.
        name: String,
    },
    /// Remove all records.
    Clear,
}

impl Mutation {
    /// Applies the mutation to a live collection.
    pub fn apply(&self, objects: &Collection<TestObject>) {
        match self {
            Mutation::Push(object) => objects.push(object.clone()),
            Mutation::Insert { index, object } => {
                let at = index % (objects.len() + 1);
                objects.insert(at, object.clone());
            }
            Mutation::Remove { index } => {
                let len = objects.len();
                if len > 0 {
                    objects.remove(index % len);
                }
            }
            Mutation::Rename { index, name } => {
                let mut items = objects.write();
                let len = items.len();
                if len > 0 {
                    items[index % len].name = name.clone();
                }
            }
            Mutation::Clear => objects.clear(),
        }
    }
}

/// Strategy for generating a single mutation.
pub fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        4 => test_object_strategy().prop_map(Mutation::Push),
        2 => (any::<usize>(), test_object_strategy())
            .prop_map(|(index, object)| Mutation::Insert { index, object }),
        2 => any::<usize>().prop_map(|index| Mutation::Remove { index }),
        2 => (any::<usize>(), field_strategy())
            .prop_map(|(index, name)| Mutation::Rename { index, name }),
        1 => Just(Mutation::Clear),
    ]
}

/// Strategy for generating a sequence of mutations.
pub fn mutation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Mutation>> {
    prop::collection::vec(mutation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
