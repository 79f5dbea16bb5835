//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use datasync_protocol::SyncOperation;
use datasync_testkit::{edit, seeded_store, SimpleEntity, SimpleStore};

/// Generates `count` entities without identity.
pub fn generate_entities(count: usize) -> Vec<SimpleEntity> {
    (0..count)
        .map(|i| {
            let n = i32::try_from(i).unwrap_or(i32::MAX);
            SimpleEntity::new(format!("entity {i}"), 8_917_200_000 + i as i64, n)
        })
        .collect()
}

/// Creates a store holding `count` committed entities.
pub fn populated_store(count: usize) -> (SimpleStore, Vec<SimpleEntity>) {
    seeded_store(generate_entities(count))
}

/// Builds a request mixing every operation outcome over `seeded`.
///
/// Every fourth entity is left unreferenced, the others are merged,
/// resubmitted unchanged or sent with a stale expectation, and `new` new
/// entities are appended.
pub fn mixed_request(seeded: &[SimpleEntity], new: usize) -> Vec<SyncOperation<SimpleEntity>> {
    let mut ops: Vec<_> = seeded
        .iter()
        .enumerate()
        .filter_map(|(i, entity)| match i % 4 {
            0 => Some(edit(entity, |e| e.integer = e.integer.wrapping_add(1))),
            1 => Some(SyncOperation::existing(entity.clone(), entity.clone())),
            2 => Some(SyncOperation::existing(
                entity.clone().with_string("mine"),
                entity.clone().with_string("stale"),
            )),
            _ => None,
        })
        .collect();

    ops.extend(
        generate_entities(new)
            .into_iter()
            .enumerate()
            .map(|(i, e)| SyncOperation::new(e.with_id(-(i as i64) - 1))),
    );
    ops
}
