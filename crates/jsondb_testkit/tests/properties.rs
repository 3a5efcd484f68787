//! Property tests for commit/rollback invariants.

use jsondb_core::{Collection, Context, CoreError, Fingerprint, InMemoryStore};
use jsondb_testkit::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn in_memory_rollback_restores_commit(
        committed in test_objects_strategy(8),
        ops in mutation_sequence_strategy(0, 12),
    ) {
        let mut fixture = TestContext::in_memory();
        fixture.objects.extend(committed.clone());
        fixture.commit().unwrap();

        for op in &ops {
            op.apply(&fixture.objects);
        }
        fixture.rollback().unwrap();

        prop_assert_eq!(fixture.objects.to_vec(), committed);
    }

    #[test]
    fn store_rollback_restores_commit(
        committed in test_objects_strategy(8),
        ops in mutation_sequence_strategy(0, 12),
    ) {
        let mut fixture = TestContext::over_store(Arc::new(InMemoryStore::new()));
        fixture.objects.extend(committed.clone());
        fixture.commit().unwrap();

        for op in &ops {
            op.apply(&fixture.objects);
        }
        fixture.rollback().unwrap();

        prop_assert_eq!(fixture.objects.to_vec(), committed);
    }

    #[test]
    fn commit_is_idempotent(
        objects in test_objects_strategy(8),
        ops in mutation_sequence_strategy(0, 12),
    ) {
        let store = Arc::new(InMemoryStore::new());
        let mut fixture = TestContext::over_store(store.clone());
        fixture.objects.extend(objects);
        for op in &ops {
            op.apply(&fixture.objects);
        }

        fixture.commit().unwrap();
        let writes = store.write_count();
        let fingerprint = fixture.fingerprint(TEST_OBJECTS);

        let report = fixture.commit().unwrap();

        prop_assert!(report.is_noop());
        prop_assert_eq!(store.write_count(), writes);
        prop_assert_eq!(fixture.fingerprint(TEST_OBJECTS), fingerprint);
    }

    #[test]
    fn stored_document_matches_checkpoint(
        objects in test_objects_strategy(8),
    ) {
        let store = Arc::new(InMemoryStore::new());
        let mut fixture = TestContext::over_store(store.clone());
        fixture.objects.extend(objects);
        fixture.commit().unwrap();

        let document = store.document(TEST_OBJECTS).unwrap();
        prop_assert_eq!(
            Some(Fingerprint::of(&document)),
            fixture.fingerprint(TEST_OBJECTS)
        );
    }

    #[test]
    fn committed_records_survive_reopen(objects in test_objects_strategy(6)) {
        let store = Arc::new(InMemoryStore::new());
        {
            let mut first = TestContext::over_store(store.clone());
            first.objects.extend(objects.clone());
            first.commit().unwrap();
        }

        let second = TestContext::over_store(store);
        prop_assert_eq!(second.objects.to_vec(), objects);
    }

    #[test]
    fn any_valid_name_maps_to_its_document(
        name in collection_name_strategy(),
        objects in test_objects_strategy(4),
    ) {
        let store = Arc::new(InMemoryStore::new());
        let collection = Collection::from(objects);
        let mut ctx = Context::builder()
            .store(store.clone())
            .register(&name, &collection)
            .build()
            .unwrap();

        prop_assert!(ctx.collection::<TestObject>(&name).is_some());
        ctx.commit().unwrap();

        let document = store.document(&name).unwrap();
        prop_assert_eq!(Fingerprint::of(&document), ctx.fingerprint(&name).unwrap());

        let duplicate = Context::builder()
            .register(&name, &collection)
            .register(&name, &Collection::<String>::new())
            .build();
        prop_assert!(
            matches!(duplicate, Err(CoreError::Registration { .. })),
            "duplicate registration accepted"
        );
    }
}

#[test]
fn file_persistence_across_instances() {
    let location = TempLocation::new();
    let mut first = TestContext::at(location.path());
    first.objects.push(TestObject::named("Committed"));
    first.commit().unwrap();
    first.objects.push(TestObject::named("Uncommitted"));

    let second = TestContext::at(location.path());
    assert_eq!(second.names(), vec!["Committed"]);
}
