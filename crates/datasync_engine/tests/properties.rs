//! Property tests for cold sync laws.

use datasync_core::{AllEntities, Identifiable};
use datasync_engine::SyncableDataSet;
use datasync_protocol::{ResponseKind, SyncOperation, SyncResponse};
use datasync_testkit::prelude::*;
use proptest::prelude::*;

fn all() -> SyncableDataSet<SimpleEntity, AllEntities> {
    SyncableDataSet::from(AllEntities)
}

proptest! {
    #[test]
    fn new_entity_reports_id_change_iff_identity_moves(
        entity in simple_entity_strategy(),
        provisional in provisional_id_strategy(),
    ) {
        let store = simple_store();
        let mut proposed = entity;
        proposed.set_identity(provisional);

        let mut txn = store.begin();
        let responses = all()
            .cold_sync(&mut txn, vec![SyncOperation::new(proposed.clone())])
            .unwrap();

        // A fresh store always assigns 1; provisional ids start at 1000.
        prop_assert_eq!(responses.len(), 1);
        let response = &responses[0];
        prop_assert_eq!(response.kind(), ResponseKind::IdChange);
        prop_assert_eq!(response.old_id().copied(), provisional);

        let mut persisted = proposed;
        persisted.set_identity(Some(1));
        prop_assert_eq!(response.entity(), Some(&persisted));
    }

    #[test]
    fn every_unreferenced_entity_is_reported_once_in_order(
        entities in simple_entities_strategy(8),
    ) {
        let (store, seeded) = seeded_store(entities);

        let mut txn = store.begin();
        let responses = all().cold_sync(&mut txn, Vec::new()).unwrap();

        let expected: Vec<SyncResponse<SimpleEntity>> =
            seeded.into_iter().map(SyncResponse::new_remote).collect();
        prop_assert_eq!(responses, expected);
    }

    #[test]
    fn unchanged_resubmission_writes_nothing(
        entities in simple_entities_strategy(6),
    ) {
        let (store, seeded) = seeded_store(entities);
        let ops: Vec<_> = seeded
            .iter()
            .map(|e| SyncOperation::existing(e.clone(), e.clone()))
            .collect();

        let mut txn = store.begin();
        let report = all().reconcile(&mut txn, ops).unwrap();

        prop_assert!(report.responses.is_empty());
        prop_assert_eq!(report.stats.unchanged, seeded.len());
        prop_assert_eq!(txn.write_count(), 0);
    }

    #[test]
    fn matching_expectation_applies_proposed_state(
        original in simple_entity_strategy(),
        replacement in simple_entity_strategy(),
    ) {
        let (store, seeded) = seeded_store(vec![original]);
        let current = seeded[0].clone();
        let mut proposed = replacement;
        proposed.set_identity(current.identity());

        let mut txn = store.begin();
        let responses = all()
            .cold_sync(&mut txn, vec![SyncOperation::existing(proposed.clone(), current.clone())])
            .unwrap();
        txn.commit();

        prop_assert!(responses.is_empty());
        prop_assert_eq!(store.get(&current.id.unwrap()), Some(proposed));
    }

    #[test]
    fn diverged_expectation_conflicts_without_writing(
        original in simple_entity_strategy(),
        stale_text in text_strategy(),
        wanted in simple_entity_strategy(),
    ) {
        let (store, seeded) = seeded_store(vec![original]);
        let current = seeded[0].clone();
        prop_assume!(stale_text != current.string);

        let expected = current.clone().with_string(stale_text);
        let mut proposed = wanted;
        proposed.set_identity(current.identity());

        let mut txn = store.begin();
        let responses = all()
            .cold_sync(&mut txn, vec![SyncOperation::existing(proposed.clone(), expected.clone())])
            .unwrap();

        prop_assert_eq!(
            responses,
            vec![SyncResponse::conflict(expected, proposed, current)]
        );
        prop_assert_eq!(txn.write_count(), 0);
    }
}
