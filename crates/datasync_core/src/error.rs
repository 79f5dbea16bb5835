//! Error types for datasync core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in datasync core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An entity type does not resolve to exactly one identity field.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the misconfiguration.
        message: String,
    },

    /// A field name is not declared by the entity's schema.
    #[error("unknown field `{field}` on entity `{entity}`")]
    UnknownField {
        /// Entity (schema) name.
        entity: String,
        /// The undeclared field.
        field: String,
    },

    /// No stored entity has the given identity.
    #[error("entity not found: {id}")]
    EntityNotFound {
        /// Debug rendering of the identity.
        id: String,
    },

    /// The store produced an identity that is already taken.
    #[error("duplicate identity: {id}")]
    DuplicateIdentity {
        /// Debug rendering of the identity.
        id: String,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// Failure reported by a store backend.
    #[error("store backend error: {message}")]
    Backend {
        /// Backend-specific description.
        message: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Creates an entity not found error from any debuggable identity.
    pub fn entity_not_found(id: &impl std::fmt::Debug) -> Self {
        Self::EntityNotFound {
            id: format!("{id:?}"),
        }
    }

    /// Creates a duplicate identity error from any debuggable identity.
    pub fn duplicate_identity(id: &impl std::fmt::Debug) -> Self {
        Self::DuplicateIdentity {
            id: format!("{id:?}"),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by entity type declarations.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
