//! Read queries that define a synchronization scope.
//!
//! There is no query language: a scope is a host-language predicate over
//! entities. Closures are scopes, so most callers never name a type here.
//!
//! ```rust,ignore
//! // every entity
//! store.select(&AllEntities)?;
//!
//! // a closure
//! store.select(&|note: &Note| note.owner == "alice")?;
//! ```

use crate::entity::{FieldValue, Record};

/// A read query selecting the entities a sync pass considers.
pub trait Scope<E> {
    /// Returns true if `entity` belongs to the scope.
    fn matches(&self, entity: &E) -> bool;
}

impl<E, F> Scope<E> for F
where
    F: Fn(&E) -> bool,
{
    fn matches(&self, entity: &E) -> bool {
        self(entity)
    }
}

/// Scope selecting every stored entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllEntities;

impl<E> Scope<E> for AllEntities {
    fn matches(&self, _entity: &E) -> bool {
        true
    }
}

/// Query-by-example over [`Record`]s.
///
/// Matches records of the named entity whose fields equal every
/// field of the example.
#[derive(Debug, Clone)]
pub struct ByExample {
    entity: String,
    fields: Vec<(String, FieldValue)>,
}

impl ByExample {
    /// Creates an example matching every record of `entity`.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a required field value.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

impl Scope<Record> for ByExample {
    fn matches(&self, record: &Record) -> bool {
        record.schema().name() == self.entity
            && self
                .fields
                .iter()
                .all(|(name, value)| record.get(name) == Some(value))
    }
}
