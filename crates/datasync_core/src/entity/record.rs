//! Schema-described dynamic records.

use crate::entity::schema::{EntitySchema, FieldKind};
use crate::entity::value::FieldValue;
use crate::error::{CoreError, CoreResult};
use crate::identity::Identifiable;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A dynamic entity whose fields are declared by an [`EntitySchema`].
///
/// Two records are equal when they are described by the same schema, have
/// equal identities and equal values in every `Value` field. `Transient`
/// fields never take part in equality.
///
/// # Example
///
/// ```
/// use datasync_core::{EntitySchema, FieldValue, Identifiable, Record};
/// use std::sync::Arc;
///
/// let schema = Arc::new(
///     EntitySchema::builder("note").identity("id").value("body").build().unwrap(),
/// );
/// let mut note = Record::new(schema);
/// note.set("body", "hello").unwrap();
/// note.set_identity(Some(FieldValue::Integer(1)));
///
/// assert_eq!(note.get("body"), Some(&FieldValue::Text("hello".into())));
/// ```
#[derive(Clone)]
pub struct Record {
    schema: Arc<EntitySchema>,
    identity: Option<FieldValue>,
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no identity and every field set to null.
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .filter(|f| f.kind != FieldKind::Identity)
            .map(|f| (f.name.clone(), FieldValue::Null))
            .collect();

        Self {
            schema,
            identity: None,
            values,
        }
    }

    /// Returns the record's schema.
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// Gets a field value.
    ///
    /// The identity field is readable by name; `None` is returned for it
    /// while the record has no identity, and for undeclared names.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        if name == self.schema.identity_field() {
            return self.identity.as_ref();
        }
        self.values.get(name)
    }

    /// Sets a value or transient field.
    ///
    /// # Errors
    ///
    /// Fails for undeclared fields, and for the identity field, which is
    /// only writable through [`Identifiable::set_identity`].
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> CoreResult<()> {
        match self.schema.field(name).map(|f| f.kind) {
            None => Err(CoreError::unknown_field(self.schema.name(), name)),
            Some(FieldKind::Identity) => Err(CoreError::invalid_operation(format!(
                "identity field `{name}` must be set through set_identity"
            ))),
            Some(_) => {
                self.values.insert(name.to_string(), value.into());
                Ok(())
            }
        }
    }

    /// Builder-style [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> CoreResult<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Iterates non-identity fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every `Value` field of `source` onto this record.
    ///
    /// Identity and transient fields are left untouched.
    ///
    /// # Errors
    ///
    /// Fails if `source` is described by a different entity.
    pub fn merge_values_from(&mut self, source: &Record) -> CoreResult<()> {
        if source.schema.name() != self.schema.name() {
            return Err(CoreError::invalid_operation(format!(
                "cannot merge `{}` into `{}`",
                source.schema.name(),
                self.schema.name()
            )));
        }
        for field in self.schema.value_fields() {
            let value = source.values.get(&field.name).cloned().unwrap_or(FieldValue::Null);
            self.values.insert(field.name.clone(), value);
        }
        Ok(())
    }

    fn same_schema(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) || *self.schema == *other.schema
    }

    fn value_fields_eq(&self, other: &Record) -> bool {
        self.schema
            .value_fields()
            .all(|f| self.values.get(&f.name) == other.values.get(&f.name))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_schema(other) && self.identity == other.identity && self.value_fields_eq(other)
    }
}

impl Identifiable for Record {
    type Id = FieldValue;

    fn identity(&self) -> Option<FieldValue> {
        self.identity.clone()
    }

    fn set_identity(&mut self, id: Option<FieldValue>) {
        self.identity = id;
    }

    fn merge_from(&mut self, source: &Self) -> CoreResult<()> {
        self.merge_values_from(source)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        s.field(self.schema.identity_field(), &self.identity);
        for (name, value) in &self.values {
            s.field(name, value);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Arc<EntitySchema> {
        Arc::new(
            EntitySchema::builder("simple")
                .identity("id")
                .value("integer")
                .value("string")
                .transient("dirty")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn new_record_is_null_filled() {
        let record = Record::new(schema());
        assert_eq!(record.identity(), None);
        assert_eq!(record.get("integer"), Some(&FieldValue::Null));
        assert_eq!(record.get("id"), None);
        assert_eq!(record.fields().count(), 3);
    }

    #[test]
    fn set_rejects_unknown_and_identity() {
        let mut record = Record::new(schema());

        let err = record.set("colour", "red").unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { .. }));

        let err = record.set("id", 5i64).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
    }

    #[test]
    fn identity_readable_by_name() {
        let mut record = Record::new(schema());
        record.set_identity(Some(FieldValue::Integer(9)));
        assert_eq!(record.get("id"), Some(&FieldValue::Integer(9)));
    }

    #[test]
    fn transient_fields_ignored_by_equality() {
        let a = Record::new(schema())
            .with("integer", 42i64)
            .unwrap()
            .with("dirty", true)
            .unwrap();
        let b = Record::new(schema())
            .with("integer", 42i64)
            .unwrap()
            .with("dirty", false)
            .unwrap();
        assert_eq!(a, b);

        let c = b.clone().with("integer", 43i64).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn identity_participates_in_equality() {
        let mut a = Record::new(schema());
        let mut b = a.clone();
        a.set_identity(Some(FieldValue::Integer(1)));
        b.set_identity(Some(FieldValue::Integer(2)));
        assert_ne!(a, b);
    }

    #[test]
    fn schemas_sharing_a_name_must_match() {
        let narrow = Arc::new(
            EntitySchema::builder("simple")
                .identity("id")
                .value("integer")
                .build()
                .unwrap(),
        );
        let wide = Arc::new(
            EntitySchema::builder("simple")
                .identity("id")
                .value("integer")
                .value("string")
                .build()
                .unwrap(),
        );
        let x = Record::new(narrow).with("integer", 1i64).unwrap();
        let y = Record::new(wide)
            .with("integer", 1i64)
            .unwrap()
            .with("string", "extra")
            .unwrap();

        assert_ne!(x, y);
        assert_ne!(y, x);
    }

    #[test]
    fn equal_schemas_in_separate_allocations_compare_equal() {
        let a = Record::new(schema()).with("integer", 5i64).unwrap();
        let b = Record::new(schema()).with("integer", 5i64).unwrap();
        assert!(!Arc::ptr_eq(a.schema(), b.schema()));
        assert_eq!(a, b);
        assert_eq!(b, a);
    }

    #[test]
    fn merge_copies_value_fields_only() {
        let mut target = Record::new(schema())
            .with("integer", 1i64)
            .unwrap()
            .with("dirty", true)
            .unwrap();
        target.set_identity(Some(FieldValue::Integer(7)));

        let mut source = Record::new(schema())
            .with("integer", 2i64)
            .unwrap()
            .with("string", "new")
            .unwrap()
            .with("dirty", false)
            .unwrap();
        source.set_identity(Some(FieldValue::Integer(1234)));

        target.merge_values_from(&source).unwrap();

        assert_eq!(target.identity(), Some(FieldValue::Integer(7)));
        assert_eq!(target.get("integer"), Some(&FieldValue::Integer(2)));
        assert_eq!(target.get("string"), Some(&FieldValue::Text("new".into())));
        assert_eq!(target.get("dirty"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn merge_rejects_foreign_entity() {
        let other = Arc::new(EntitySchema::builder("other").identity("id").build().unwrap());
        let mut target = Record::new(schema());
        let err = target.merge_values_from(&Record::new(other)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation { .. }));
    }

    #[test]
    fn debug_uses_entity_name() {
        let record = Record::new(schema()).with("integer", 3i64).unwrap();
        let rendered = format!("{record:?}");
        assert!(rendered.starts_with("simple"));
        assert!(rendered.contains("integer"));
    }
}
