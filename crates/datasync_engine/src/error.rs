//! Error types for the sync engine.

use datasync_core::CoreError;
use datasync_protocol::ProtocolError;
use std::fmt::Debug;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort a sync pass.
///
/// Conflicts are not errors; they are reported as responses.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] CoreError),

    /// A request or response batch could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] ProtocolError),

    /// An existing operation carries no identity.
    #[error("operation {index}: existing entity has no identity")]
    MissingIdentity {
        /// Position of the operation in the request.
        index: usize,
    },

    /// An existing operation addresses an entity outside the scope.
    #[error("operation {index}: entity {id} is not in scope")]
    EntityNotInScope {
        /// Position of the operation in the request.
        index: usize,
        /// Debug rendering of the identity.
        id: String,
    },

    /// The proposed and expected entities of an existing operation have
    /// different identities.
    #[error("operation {index}: proposed identity {proposed} does not match expected identity {expected}")]
    IdentityMismatch {
        /// Position of the operation in the request.
        index: usize,
        /// Debug rendering of the proposed identity.
        proposed: String,
        /// Debug rendering of the expected identity.
        expected: String,
    },

    /// More than one existing operation addresses the same entity.
    #[error("entity {id} is referenced by operations {first} and {second}")]
    DuplicateReference {
        /// Debug rendering of the identity.
        id: String,
        /// Position of the first operation.
        first: usize,
        /// Position of the repeated operation.
        second: usize,
    },

    /// A new entity's provisional identity belongs to an in-scope entity.
    #[error("operation {index}: provisional identity {id} collides with an in-scope entity")]
    IdentityCollision {
        /// Position of the operation in the request.
        index: usize,
        /// Debug rendering of the identity.
        id: String,
    },
}

impl SyncError {
    /// Creates an entity not in scope error.
    pub fn not_in_scope(index: usize, id: &impl Debug) -> Self {
        Self::EntityNotInScope {
            index,
            id: format!("{id:?}"),
        }
    }

    /// Creates an identity mismatch error.
    pub fn identity_mismatch(index: usize, proposed: &impl Debug, expected: &impl Debug) -> Self {
        Self::IdentityMismatch {
            index,
            proposed: format!("{proposed:?}"),
            expected: format!("{expected:?}"),
        }
    }

    /// Creates a duplicate reference error.
    pub fn duplicate_reference(id: &impl Debug, first: usize, second: usize) -> Self {
        Self::DuplicateReference {
            id: format!("{id:?}"),
            first,
            second,
        }
    }

    /// Creates an identity collision error.
    pub fn identity_collision(index: usize, id: &impl Debug) -> Self {
        Self::IdentityCollision {
            index,
            id: format!("{id:?}"),
        }
    }

    /// Returns true if the request itself is at fault rather than the
    /// store.
    pub fn is_protocol_error(&self) -> bool {
        !matches!(self, SyncError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors() {
        assert!(SyncError::MissingIdentity { index: 0 }.is_protocol_error());
        assert!(SyncError::not_in_scope(1, &42i64).is_protocol_error());
        assert!(SyncError::duplicate_reference(&1i64, 0, 2).is_protocol_error());
        assert!(SyncError::from(ProtocolError::codec("eof")).is_protocol_error());
        assert!(!SyncError::from(CoreError::backend("disk full")).is_protocol_error());
    }

    #[test]
    fn error_display() {
        let err = SyncError::not_in_scope(3, &Some(42i64));
        assert_eq!(err.to_string(), "operation 3: entity Some(42) is not in scope");

        let err = SyncError::identity_mismatch(0, &Some(1i64), &Some(2i64));
        assert!(err.to_string().contains("Some(1)"));
        assert!(err.to_string().contains("Some(2)"));

        let err = SyncError::from(CoreError::entity_not_found(&7i64));
        assert_eq!(err.to_string(), "store error: entity not found: 7");
    }
}
