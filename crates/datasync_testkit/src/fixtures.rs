//! Test fixtures and store helpers.
//!
//! Provides a small statically typed entity, stores pre-populated with
//! committed entities, and a schema-described record for dynamic tests.

use datasync_core::{EntitySchema, FieldValue, Identifiable, MemoryStore, Record, Sequence};
use datasync_protocol::SyncOperation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A minimal entity: an identity plus a timestamp, an integer and a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleEntity {
    /// Identity, absent before first persistence.
    pub id: Option<i64>,
    /// Milliseconds since the Unix epoch.
    pub date: i64,
    /// Integer payload.
    pub integer: i32,
    /// String payload.
    pub string: String,
}

impl SimpleEntity {
    /// Creates an entity without identity.
    pub fn new(string: impl Into<String>, date: i64, integer: i32) -> Self {
        Self {
            id: None,
            date,
            integer,
            string: string.into(),
        }
    }

    /// Returns a copy carrying `id`.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns a copy with `string` replaced.
    #[must_use]
    pub fn with_string(mut self, string: impl Into<String>) -> Self {
        self.string = string.into();
        self
    }
}

impl Identifiable for SimpleEntity {
    type Id = i64;

    fn identity(&self) -> Option<i64> {
        self.id
    }

    fn set_identity(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

/// Store of [`SimpleEntity`] with sequential identities starting at 1.
pub type SimpleStore = MemoryStore<SimpleEntity, Sequence>;

/// Creates an empty [`SimpleStore`].
pub fn simple_store() -> SimpleStore {
    SimpleStore::default()
}

/// Creates a store holding `entities` as committed state.
///
/// Returns the store and the detached copies with their assigned
/// identities, in input order.
pub fn seeded_store(entities: Vec<SimpleEntity>) -> (SimpleStore, Vec<SimpleEntity>) {
    let store = simple_store();
    let saved = entities
        .into_iter()
        .map(|e| store.insert_committed(e).expect("Failed to seed entity"))
        .collect();
    (store, saved)
}

/// Builds an `Existing` operation applying `change` to `current`.
///
/// The expected state is `current` itself, as a client that saw the
/// latest server state would send.
pub fn edit<E: Clone>(current: &E, change: impl FnOnce(&mut E)) -> SyncOperation<E> {
    let mut proposed = current.clone();
    change(&mut proposed);
    SyncOperation::existing(proposed, current.clone())
}

/// Schema of the dynamic counterpart of [`SimpleEntity`].
///
/// The `cache` field is transient.
pub fn simple_schema() -> Arc<EntitySchema> {
    Arc::new(
        EntitySchema::builder("simple")
            .identity("id")
            .value("date")
            .value("integer")
            .value("string")
            .transient("cache")
            .build()
            .expect("Invalid simple schema"),
    )
}

/// Creates a `simple` record without identity.
pub fn simple_record(string: &str, date: i64, integer: i64) -> Record {
    Record::new(simple_schema())
        .with("date", FieldValue::Timestamp(date))
        .and_then(|r| r.with("integer", integer))
        .and_then(|r| r.with("string", string))
        .expect("Failed to build simple record")
}

/// Store of records with sequential integer identities.
pub type RecordStore = MemoryStore<Record, Sequence>;
