//! Sync responses.

use datasync_core::Identifiable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of sync response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// A new entity received a final identity.
    IdChange,
    /// An in-scope entity the client never referenced.
    NewRemoteEntity,
    /// The client's expected state no longer matches the server.
    Conflict,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::IdChange => f.write_str("id_change"),
            ResponseKind::NewRemoteEntity => f.write_str("new_remote_entity"),
            ResponseKind::Conflict => f.write_str("conflict"),
        }
    }
}

/// Outcome of a sync pass that the client has to act on.
///
/// Operations that succeed without changing what the client already knows
/// produce no response at all. Responses are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "E: Serialize, E::Id: Serialize",
    deserialize = "E: Deserialize<'de>, E::Id: Deserialize<'de>"
))]
pub enum SyncResponse<E: Identifiable> {
    /// The server persisted a new entity under a different identity than
    /// the client's provisional one.
    IdChange {
        /// Provisional identity sent by the client, if it sent one.
        old_id: Option<E::Id>,
        /// The persisted entity, carrying its final identity.
        entity: E,
    },
    /// An in-scope server entity that no operation referenced.
    NewRemoteEntity {
        /// The server's entity.
        entity: E,
    },
    /// The server state diverged from what the client expected. Nothing
    /// was written.
    Conflict {
        /// State the client expected.
        expected: E,
        /// State the client asked for.
        requested_new: E,
        /// State the server actually holds.
        actual_new: E,
    },
}

impl<E: Identifiable> SyncResponse<E> {
    /// Creates an `IdChange` response.
    pub fn id_change(old_id: Option<E::Id>, entity: E) -> Self {
        SyncResponse::IdChange { old_id, entity }
    }

    /// Creates a `NewRemoteEntity` response.
    pub fn new_remote(entity: E) -> Self {
        SyncResponse::NewRemoteEntity { entity }
    }

    /// Creates a `Conflict` response.
    pub fn conflict(expected: E, requested_new: E, actual_new: E) -> Self {
        SyncResponse::Conflict {
            expected,
            requested_new,
            actual_new,
        }
    }

    /// Returns the response kind.
    pub fn kind(&self) -> ResponseKind {
        match self {
            SyncResponse::IdChange { .. } => ResponseKind::IdChange,
            SyncResponse::NewRemoteEntity { .. } => ResponseKind::NewRemoteEntity,
            SyncResponse::Conflict { .. } => ResponseKind::Conflict,
        }
    }

    /// Returns the entity of an `IdChange` or `NewRemoteEntity` response.
    pub fn entity(&self) -> Option<&E> {
        match self {
            SyncResponse::IdChange { entity, .. } | SyncResponse::NewRemoteEntity { entity } => {
                Some(entity)
            }
            SyncResponse::Conflict { .. } => None,
        }
    }

    /// Returns the provisional identity of an `IdChange` response.
    pub fn old_id(&self) -> Option<&E::Id> {
        match self {
            SyncResponse::IdChange { old_id, .. } => old_id.as_ref(),
            _ => None,
        }
    }

    /// Returns the expected state of a `Conflict` response.
    pub fn expected(&self) -> Option<&E> {
        match self {
            SyncResponse::Conflict { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// Returns the requested state of a `Conflict` response.
    pub fn requested_new(&self) -> Option<&E> {
        match self {
            SyncResponse::Conflict { requested_new, .. } => Some(requested_new),
            _ => None,
        }
    }

    /// Returns the actual server state of a `Conflict` response.
    pub fn actual_new(&self) -> Option<&E> {
        match self {
            SyncResponse::Conflict { actual_new, .. } => Some(actual_new),
            _ => None,
        }
    }

    /// Returns true for a `Conflict` response.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncResponse::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Option<u32>,
        body: String,
    }

    impl Identifiable for Note {
        type Id = u32;

        fn identity(&self) -> Option<u32> {
            self.id
        }

        fn set_identity(&mut self, id: Option<u32>) {
            self.id = id;
        }
    }

    fn note(id: u32, body: &str) -> Note {
        Note {
            id: Some(id),
            body: body.into(),
        }
    }

    #[test]
    fn id_change_accessors() {
        let r = SyncResponse::id_change(Some(1234), note(1, "a"));
        assert_eq!(r.kind(), ResponseKind::IdChange);
        assert_eq!(r.old_id(), Some(&1234));
        assert_eq!(r.entity().and_then(|n| n.id), Some(1));
        assert!(r.expected().is_none());
        assert!(!r.is_conflict());

        let anonymous = SyncResponse::id_change(None, note(2, "b"));
        assert_eq!(anonymous.old_id(), None);
    }

    #[test]
    fn conflict_accessors() {
        let r = SyncResponse::conflict(note(1, "expected"), note(1, "requested"), note(1, "actual"));
        assert!(r.is_conflict());
        assert!(r.entity().is_none());
        assert_eq!(r.expected().unwrap().body, "expected");
        assert_eq!(r.requested_new().unwrap().body, "requested");
        assert_eq!(r.actual_new().unwrap().body, "actual");
        assert_eq!(r.old_id(), None);
    }

    #[test]
    fn new_remote_accessors() {
        let r = SyncResponse::new_remote(note(7, "remote"));
        assert_eq!(r.kind(), ResponseKind::NewRemoteEntity);
        assert_eq!(r.entity(), Some(&note(7, "remote")));
        assert!(r.actual_new().is_none());
    }

    #[test]
    fn wire_shape_keeps_variant_tag() {
        let r: SyncResponse<Note> = SyncResponse::id_change(Some(1234), note(1, "a"));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(
            value,
            json!({ "IdChange": { "old_id": 1234, "entity": { "id": 1, "body": "a" } } })
        );

        let back: SyncResponse<Note> = serde_json::from_value(value).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ResponseKind::Conflict.to_string(), "conflict");
        assert_eq!(ResponseKind::NewRemoteEntity.to_string(), "new_remote_entity");
    }
}
