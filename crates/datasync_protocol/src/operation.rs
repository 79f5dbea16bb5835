//! Sync operations.

use datasync_core::Identifiable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Entity created on the client, never persisted on the server.
    New,
    /// Entity the client believes is already persisted.
    Existing,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::New => f.write_str("new"),
            OperationKind::Existing => f.write_str("existing"),
        }
    }
}

/// A single change proposed by a client.
///
/// A `New` operation carries only the proposed entity, whose identity (if
/// any) is provisional. An `Existing` operation also carries the state the
/// client believes is currently persisted; the server applies the change
/// only if that belief still holds.
///
/// The enum makes the pairing structural: a new operation cannot carry an
/// expected state and an existing one cannot lack it, whether built in
/// memory or decoded from the wire.
///
/// # Example
///
/// ```rust,ignore
/// let ops = vec![
///     SyncOperation::new(draft),
///     SyncOperation::existing(edited, as_last_seen),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncOperation<E> {
    /// Create an entity.
    New {
        /// Entity to persist.
        proposed: E,
    },
    /// Update an entity the client already knows.
    Existing {
        /// Desired new state.
        proposed: E,
        /// State the client believes the server holds.
        expected: E,
    },
}

impl<E> SyncOperation<E> {
    /// Creates a `New` operation.
    pub fn new(proposed: E) -> Self {
        SyncOperation::New { proposed }
    }

    /// Creates an `Existing` operation.
    pub fn existing(proposed: E, expected: E) -> Self {
        SyncOperation::Existing { proposed, expected }
    }

    /// Returns the operation kind.
    pub fn kind(&self) -> OperationKind {
        match self {
            SyncOperation::New { .. } => OperationKind::New,
            SyncOperation::Existing { .. } => OperationKind::Existing,
        }
    }

    /// Returns the proposed entity.
    pub fn proposed(&self) -> &E {
        match self {
            SyncOperation::New { proposed } | SyncOperation::Existing { proposed, .. } => proposed,
        }
    }

    /// Returns the expected entity, present only for `Existing`.
    pub fn expected(&self) -> Option<&E> {
        match self {
            SyncOperation::New { .. } => None,
            SyncOperation::Existing { expected, .. } => Some(expected),
        }
    }

    /// Returns true for a `New` operation.
    pub fn is_new(&self) -> bool {
        matches!(self, SyncOperation::New { .. })
    }
}

impl<E: Identifiable> SyncOperation<E> {
    /// Returns the identity carried by the proposed entity.
    ///
    /// For `New` operations this is the provisional identity, if any.
    pub fn proposed_id(&self) -> Option<E::Id> {
        self.proposed().identity()
    }
}
