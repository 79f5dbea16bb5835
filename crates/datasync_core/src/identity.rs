//! Entity identity capability.
//!
//! Every syncable entity exposes exactly one identity value. The identity
//! is absent until the store persists the entity for the first time; a
//! client may fill it with a provisional value, which the store never
//! trusts as final.

use crate::error::CoreResult;
use std::fmt::Debug;

/// Access to an entity's primary-key value.
///
/// # Example
///
/// ```
/// use datasync_core::Identifiable;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Note {
///     id: Option<u64>,
///     body: String,
/// }
///
/// impl Identifiable for Note {
///     type Id = u64;
///
///     fn identity(&self) -> Option<u64> {
///         self.id
///     }
///
///     fn set_identity(&mut self, id: Option<u64>) {
///         self.id = id;
///     }
/// }
///
/// let mut note = Note { id: None, body: "hi".into() };
/// datasync_core::set_id(&mut note, 7);
/// assert_eq!(datasync_core::get_id(&note), Some(7));
/// ```
pub trait Identifiable {
    /// The identity type. Ordered so scopes can be keyed and sorted by it.
    type Id: Clone + Ord + Debug;

    /// Returns the identity, or `None` if the entity was never persisted
    /// and carries no provisional identity.
    fn identity(&self) -> Option<Self::Id>;

    /// Replaces the identity. `None` clears it.
    fn set_identity(&mut self, id: Option<Self::Id>);

    /// Copies the persisted field values of `source` onto `self`, keeping
    /// `self`'s identity.
    ///
    /// The default replaces every field. Types with fields that must
    /// survive a merge override this.
    ///
    /// # Errors
    ///
    /// Implementations fail when `source` cannot be merged into `self`.
    fn merge_from(&mut self, source: &Self) -> CoreResult<()>
    where
        Self: Clone,
    {
        let id = self.identity();
        *self = source.clone();
        self.set_identity(id);
        Ok(())
    }
}

/// Bound satisfied by every entity the sync engine can reconcile.
///
/// `PartialEq` must be full value equality over persisted fields,
/// identity included.
pub trait Entity: Identifiable + Clone + PartialEq + Debug {}

impl<T> Entity for T where T: Identifiable + Clone + PartialEq + Debug {}

/// Returns the identity of `entity`.
pub fn get_id<E: Identifiable>(entity: &E) -> Option<E::Id> {
    entity.identity()
}

/// Sets the identity of `entity`.
pub fn set_id<E: Identifiable>(entity: &mut E, id: E::Id) {
    entity.set_identity(Some(id));
}

/// Returns a copy of `entity` carrying `id` as its identity.
#[must_use]
pub fn with_identity<E: Identifiable + Clone>(entity: &E, id: Option<E::Id>) -> E {
    let mut copy = entity.clone();
    copy.set_identity(id);
    copy
}
