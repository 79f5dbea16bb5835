//! Dynamic, schema-described entities.

mod record;
mod schema;
mod value;

pub use record::Record;
pub use schema::{EntitySchema, FieldDef, FieldKind, SchemaBuilder};
pub use value::FieldValue;
