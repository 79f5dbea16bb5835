//! In-memory entity store.

use crate::error::CoreResult;
use crate::identity::Entity;
use crate::scope::Scope;
use crate::store::generator::IdGenerator;
use crate::store::transaction::{PendingWrite, StoreTransaction};
use crate::store::EntityStore;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A transactional, in-memory entity store.
///
/// Committed entities are kept ordered by identity, which is the natural
/// order scoped reads return them in. All writes go through a
/// [`StoreTransaction`]:
///
/// - Single writer: [`begin`](Self::begin) takes an exclusive lock held
///   until the transaction commits, rolls back or is dropped
/// - Isolation: readers outside the transaction see only committed state
/// - Atomicity: pending writes are applied together on commit
///
/// Entities returned by any read are detached copies; mutating them never
/// touches the store.
///
/// # Example
///
/// ```rust,ignore
/// let store: MemoryStore<Note, Sequence> = MemoryStore::default();
///
/// let mut txn = store.begin();
/// let saved = txn.persist(note)?;
/// txn.commit();
///
/// assert_eq!(store.get(&saved.identity().unwrap()), Some(saved));
/// ```
pub struct MemoryStore<E: Entity, G> {
    /// Committed entities by identity.
    entities: RwLock<BTreeMap<E::Id, E>>,
    /// Source of final identities.
    generator: Mutex<G>,
    /// Write lock - only one transaction at a time.
    write_lock: Mutex<()>,
    /// Number of transactions committed.
    commits: AtomicU64,
}

impl<E: Entity, G: IdGenerator<E::Id>> MemoryStore<E, G> {
    /// Creates an empty store assigning identities from `generator`.
    pub fn new(generator: G) -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            generator: Mutex::new(generator),
            write_lock: Mutex::new(()),
            commits: AtomicU64::new(0),
        }
    }

    /// Begins a transaction, blocking while another one is open.
    ///
    /// Calling this from a thread that already holds an open transaction
    /// on the same store deadlocks.
    pub fn begin(&self) -> StoreTransaction<'_, E, G> {
        let guard = self.write_lock.lock();
        StoreTransaction::new(self, guard)
    }

    /// Begins a transaction if no other one is open.
    pub fn try_begin(&self) -> Option<StoreTransaction<'_, E, G>> {
        self.write_lock
            .try_lock()
            .map(|guard| StoreTransaction::new(self, guard))
    }

    /// Gets a committed entity by identity.
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.entities.read().get(id).cloned()
    }

    /// Returns every committed entity in identity order.
    pub fn list(&self) -> Vec<E> {
        self.entities.read().values().cloned().collect()
    }

    /// Returns committed entities selected by `scope`, in identity order.
    pub fn select(&self, scope: &dyn Scope<E>) -> Vec<E> {
        self.entities
            .read()
            .values()
            .filter(|e| scope.matches(e))
            .cloned()
            .collect()
    }

    /// Returns the number of committed entities.
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Returns true if no entity is committed.
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Returns the number of committed transactions.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Persists and commits `entity` in its own transaction, returning the
    /// detached copy with its assigned identity.
    ///
    /// Blocks while another transaction is open.
    pub fn insert_committed(&self, entity: E) -> CoreResult<E> {
        let mut txn = self.begin();
        let saved = txn.persist(entity)?;
        txn.commit();
        Ok(saved)
    }

    pub(crate) fn next_id(&self) -> E::Id {
        self.generator.lock().next_id()
    }

    pub(crate) fn read_committed<R>(&self, f: impl FnOnce(&BTreeMap<E::Id, E>) -> R) -> R {
        f(&self.entities.read())
    }

    /// Applies a transaction's pending writes atomically.
    pub(crate) fn apply(&self, writes: BTreeMap<E::Id, PendingWrite<E>>) -> usize {
        let count = writes.len();
        {
            let mut entities = self.entities.write();
            for (id, write) in writes {
                entities.insert(id, write.into_entity());
            }
        }
        let seq = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(writes = count, commit = seq, "memory store commit");
        count
    }
}

impl<E: Entity, G: IdGenerator<E::Id> + Default> Default for MemoryStore<E, G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

impl<E: Entity, G> std::fmt::Debug for MemoryStore<E, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.entities.read().len())
            .field("commits", &self.commits.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
