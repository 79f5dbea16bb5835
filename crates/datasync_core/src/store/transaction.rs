//! Transactions over the in-memory store.

use crate::error::{CoreError, CoreResult};
use crate::identity::Entity;
use crate::scope::Scope;
use crate::store::generator::IdGenerator;
use crate::store::memory::MemoryStore;
use crate::store::EntityStore;
use parking_lot::MutexGuard;
use std::collections::BTreeMap;
use tracing::debug;

/// A write buffered in a transaction.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite<E> {
    /// Entity persisted for the first time in this transaction.
    Insert(E),
    /// Merged state of an entity committed before this transaction.
    Update(E),
}

impl<E> PendingWrite<E> {
    fn entity(&self) -> &E {
        match self {
            PendingWrite::Insert(e) | PendingWrite::Update(e) => e,
        }
    }

    pub(crate) fn into_entity(self) -> E {
        match self {
            PendingWrite::Insert(e) | PendingWrite::Update(e) => e,
        }
    }
}

/// An open transaction on a [`MemoryStore`].
///
/// Reads made through the transaction see its own pending writes; nobody
/// else does until [`commit`](Self::commit). Dropping the transaction
/// without committing discards every pending write, as does
/// [`rollback`](Self::rollback).
pub struct StoreTransaction<'a, E: Entity, G> {
    store: &'a MemoryStore<E, G>,
    /// Pending writes by identity.
    writes: BTreeMap<E::Id, PendingWrite<E>>,
    /// Set once committed or rolled back.
    finished: bool,
    /// Holds the store's single-writer lock.
    _writer: MutexGuard<'a, ()>,
}

impl<'a, E: Entity, G: IdGenerator<E::Id>> StoreTransaction<'a, E, G> {
    pub(crate) fn new(store: &'a MemoryStore<E, G>, writer: MutexGuard<'a, ()>) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
            finished: false,
            _writer: writer,
        }
    }

    /// Returns the number of pending writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Returns the number of entities persisted for the first time.
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.writes
            .values()
            .filter(|w| matches!(w, PendingWrite::Insert(_)))
            .count()
    }

    /// Gets an entity, seeing this transaction's own pending writes.
    pub fn get(&self, id: &E::Id) -> Option<E> {
        match self.writes.get(id) {
            Some(write) => Some(write.entity().clone()),
            None => self.store.get(id),
        }
    }

    /// Applies every pending write atomically and returns how many there
    /// were.
    pub fn commit(mut self) -> usize {
        self.finished = true;
        let writes = std::mem::take(&mut self.writes);
        self.store.apply(writes)
    }

    /// Discards every pending write.
    pub fn rollback(mut self) {
        self.finished = true;
        debug!(writes = self.writes.len(), "memory store rollback");
        self.writes.clear();
    }

    fn contains(&self, id: &E::Id) -> bool {
        self.writes.contains_key(id) || self.store.read_committed(|c| c.contains_key(id))
    }
}

impl<E: Entity, G: IdGenerator<E::Id>> EntityStore<E> for StoreTransaction<'_, E, G> {
    fn select(&self, scope: &dyn Scope<E>) -> CoreResult<Vec<E>> {
        Ok(self.store.read_committed(|committed| {
            let mut view: BTreeMap<&E::Id, &E> = committed.iter().collect();
            for (id, write) in &self.writes {
                view.insert(id, write.entity());
            }
            view.into_values()
                .filter(|e| scope.matches(e))
                .cloned()
                .collect()
        }))
    }

    fn persist(&mut self, mut entity: E) -> CoreResult<E> {
        let id = self.store.next_id();
        if self.contains(&id) {
            return Err(CoreError::duplicate_identity(&id));
        }

        entity.set_identity(Some(id.clone()));
        self.writes.insert(id, PendingWrite::Insert(entity.clone()));
        Ok(entity)
    }

    fn merge(&mut self, id: &E::Id, source: &E) -> CoreResult<()> {
        let mut target = self.get(id).ok_or_else(|| CoreError::entity_not_found(id))?;
        target.merge_from(source)?;

        let write = match self.writes.remove(id) {
            Some(PendingWrite::Insert(_)) => PendingWrite::Insert(target),
            _ => PendingWrite::Update(target),
        };
        self.writes.insert(id.clone(), write);
        Ok(())
    }

    fn find(&self, id: &E::Id) -> CoreResult<Option<E>> {
        Ok(self.get(id))
    }
}

impl<E: Entity, G> Drop for StoreTransaction<'_, E, G> {
    fn drop(&mut self) {
        if !self.finished && !self.writes.is_empty() {
            debug!(
                writes = self.writes.len(),
                "memory store transaction dropped without commit"
            );
        }
    }
}

impl<E: Entity, G> std::fmt::Debug for StoreTransaction<'_, E, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreTransaction")
            .field("writes", &self.writes.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identifiable;
    use crate::scope::AllEntities;
    use crate::store::{FromFn, Sequence};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: Option<u64>,
        qty: i64,
    }

    impl Identifiable for Item {
        type Id = u64;

        fn identity(&self) -> Option<u64> {
            self.id
        }

        fn set_identity(&mut self, id: Option<u64>) {
            self.id = id;
        }
    }

    fn item(qty: i64) -> Item {
        Item { id: None, qty }
    }

    fn store() -> MemoryStore<Item, Sequence> {
        MemoryStore::default()
    }

    #[test]
    fn persist_replaces_provisional_identity() {
        let store = store();
        let mut txn = store.begin();

        let saved = txn
            .persist(Item {
                id: Some(1234),
                qty: 1,
            })
            .unwrap();

        assert_eq!(saved.id, Some(1));
        assert_eq!(txn.insert_count(), 1);
    }

    #[test]
    fn uncommitted_writes_visible_only_inside() {
        let store = store();
        let mut txn = store.begin();
        txn.persist(item(7)).unwrap();

        assert_eq!(txn.select(&AllEntities).unwrap().len(), 1);
        assert_eq!(txn.find(&1).unwrap().map(|i| i.qty), Some(7));
        assert!(store.is_empty());

        assert_eq!(txn.commit(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rollback_discards_writes() {
        let store = store();
        store.insert_committed(item(1)).unwrap();

        let mut txn = store.begin();
        txn.persist(item(2)).unwrap();
        txn.merge(&1, &item(100)).unwrap();
        txn.rollback();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&1).unwrap().qty, 1);
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn drop_discards_writes() {
        let store = store();
        {
            let mut txn = store.begin();
            txn.persist(item(2)).unwrap();
        }
        assert!(store.is_empty());
    }

    #[test]
    fn merge_keeps_stored_identity() {
        let store = store();
        store.insert_committed(item(1)).unwrap();

        let mut txn = store.begin();
        txn.merge(
            &1,
            &Item {
                id: Some(555),
                qty: 42,
            },
        )
        .unwrap();
        txn.commit();

        assert_eq!(store.get(&1), Some(Item { id: Some(1), qty: 42 }));
        assert!(store.get(&555).is_none());
    }

    #[test]
    fn merge_of_pending_insert_stays_insert() {
        let store = store();
        let mut txn = store.begin();
        let saved = txn.persist(item(1)).unwrap();
        txn.merge(&saved.id.unwrap(), &item(2)).unwrap();

        assert_eq!(txn.insert_count(), 1);
        assert_eq!(txn.get(&1).unwrap().qty, 2);
    }

    #[test]
    fn merge_unknown_identity_fails() {
        let store = store();
        let mut txn = store.begin();
        let err = txn.merge(&9, &item(1)).unwrap_err();
        assert!(matches!(err, CoreError::EntityNotFound { .. }));
        assert_eq!(txn.write_count(), 0);
    }

    #[test]
    fn duplicate_generated_identity_rejected() {
        let store = MemoryStore::new(FromFn(|| 5u64));
        store.insert_committed(item(1)).unwrap();

        let mut txn = store.begin();
        let err = txn.persist(item(2)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateIdentity { .. }));
    }

    #[test]
    fn select_overlays_pending_updates() {
        let store = store();
        store.insert_committed(item(1)).unwrap();
        store.insert_committed(item(2)).unwrap();

        let mut txn = store.begin();
        txn.merge(&2, &item(20)).unwrap();

        let qtys: Vec<i64> = txn
            .select(&AllEntities)
            .unwrap()
            .into_iter()
            .map(|i| i.qty)
            .collect();
        assert_eq!(qtys, vec![1, 20]);

        let scoped = txn.select(&|i: &Item| i.qty > 10).unwrap();
        assert_eq!(scoped.len(), 1);
    }
}
