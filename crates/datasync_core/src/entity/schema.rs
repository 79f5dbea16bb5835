//! Entity schemas for dynamic records.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeSet;

/// Role of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The primary key. Exactly one per schema.
    Identity,
    /// A persisted value field, compared and merged during sync.
    Value,
    /// Carried with the record but never compared or merged.
    Transient,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, unique within the schema.
    pub name: String,
    /// Field role.
    pub kind: FieldKind,
}

impl FieldDef {
    /// Creates a field definition.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Declaration of an entity type: its name and fields.
///
/// A schema is validated on construction, so every `EntitySchema` in
/// existence resolves to exactly one identity field.
///
/// # Example
///
/// ```
/// use datasync_core::EntitySchema;
///
/// let schema = EntitySchema::builder("note")
///     .identity("id")
///     .value("body")
///     .transient("cursor")
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.identity_field(), "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    name: String,
    fields: Vec<FieldDef>,
    identity_index: usize,
}

impl EntitySchema {
    /// Creates and validates a schema.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] when the fields declare zero or
    /// several identity fields, or repeat a field name.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> CoreResult<Self> {
        let name = name.into();

        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::configuration(format!(
                    "entity `{name}` declares field `{}` more than once",
                    field.name
                )));
            }
        }

        let identities: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == FieldKind::Identity)
            .map(|(i, _)| i)
            .collect();

        let identity_index = match identities.as_slice() {
            [only] => *only,
            [] => {
                return Err(CoreError::configuration(format!(
                    "entity `{name}` declares no identity field"
                )))
            }
            many => {
                return Err(CoreError::configuration(format!(
                    "entity `{name}` declares {} identity fields",
                    many.len()
                )))
            }
        };

        Ok(Self {
            name,
            fields,
            identity_index,
        })
    }

    /// Starts building a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identity field's name.
    pub fn identity_field(&self) -> &str {
        &self.fields[self.identity_index].name
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns all declared fields in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the fields compared and merged during sync.
    pub fn value_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Value)
    }
}

/// Builder for [`EntitySchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Declares the identity field.
    #[must_use]
    pub fn identity(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef::new(name, FieldKind::Identity));
        self
    }

    /// Declares a value field.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef::new(name, FieldKind::Value));
        self
    }

    /// Declares a transient field.
    #[must_use]
    pub fn transient(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef::new(name, FieldKind::Transient));
        self
    }

    /// Validates and builds the schema.
    ///
    /// # Errors
    ///
    /// See [`EntitySchema::new`].
    pub fn build(self) -> CoreResult<EntitySchema> {
        EntitySchema::new(self.name, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_schema() {
        let schema = EntitySchema::builder("simple")
            .identity("id")
            .value("date")
            .value("integer")
            .value("string")
            .build()
            .unwrap();

        assert_eq!(schema.name(), "simple");
        assert_eq!(schema.identity_field(), "id");
        assert_eq!(schema.value_fields().count(), 3);
        assert_eq!(schema.field("date").map(|f| f.kind), Some(FieldKind::Value));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn identity_need_not_come_first() {
        let schema = EntitySchema::builder("late")
            .value("a")
            .identity("key")
            .build()
            .unwrap();
        assert_eq!(schema.identity_field(), "key");
    }

    #[test]
    fn rejects_missing_identity() {
        let err = EntitySchema::builder("anon").value("a").build().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("no identity field"));
    }

    #[test]
    fn rejects_multiple_identities() {
        let err = EntitySchema::builder("twin")
            .identity("a")
            .identity("b")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("2 identity fields"));
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = EntitySchema::builder("dup")
            .identity("id")
            .value("x")
            .transient("x")
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
