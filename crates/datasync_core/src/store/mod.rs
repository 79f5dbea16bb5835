//! Entity store contract and the in-memory implementation.
//!
//! The sync engine talks to persistence only through [`EntityStore`].
//! Every call made through it participates in a transaction owned by
//! the caller: the engine never commits or rolls back.

mod generator;
mod memory;
mod transaction;

pub use generator::{FromFn, IdGenerator, Sequence, UuidGenerator};
pub use memory::MemoryStore;
pub use transaction::StoreTransaction;

use crate::error::CoreResult;
use crate::identity::Entity;
use crate::scope::Scope;

/// Persistence operations required by a synchronization pass.
pub trait EntityStore<E: Entity> {
    /// Returns the entities selected by `scope`, in the store's natural
    /// order. Entities without identity are never returned.
    fn select(&self, scope: &dyn Scope<E>) -> CoreResult<Vec<E>>;

    /// Persists a new entity and returns it carrying its final identity.
    ///
    /// Any identity already present on `entity` is provisional and is
    /// replaced. The final identity must be fresh: it may not belong to any
    /// entity already stored or persisted earlier in the same transaction.
    /// Implementations that cannot guarantee this should fail with
    /// [`CoreError::DuplicateIdentity`](crate::CoreError::DuplicateIdentity).
    fn persist(&mut self, entity: E) -> CoreResult<E>;

    /// Copies the field values of `source` onto the stored entity `id`.
    fn merge(&mut self, id: &E::Id, source: &E) -> CoreResult<()>;

    /// Looks up a single entity by identity.
    fn find(&self, id: &E::Id) -> CoreResult<Option<E>> {
        let by_id = |e: &E| e.identity().as_ref() == Some(id);
        Ok(self.select(&by_id)?.into_iter().next())
    }
}
