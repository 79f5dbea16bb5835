//! # Datasync Core
//!
//! Entity model and persistence contract for datasync.
//!
//! This crate provides:
//! - The [`Identifiable`] capability and the [`Entity`] bound
//! - Schema-described dynamic [`Record`]s with typed [`FieldValue`]s
//! - [`Scope`] read queries selecting the entities of a sync pass
//! - The [`EntityStore`] contract (scoped read, persist, merge)
//! - A transactional [`MemoryStore`] with pluggable identity generators
//!
//! ## Key Invariants
//!
//! - An entity has exactly one identity, absent until first persisted
//! - Identities supplied by clients are provisional; the store assigns
//!   the final one
//! - Entity equality is full value equality over persisted fields
//! - Store writes are invisible outside a transaction until it commits

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod identity;
mod scope;
mod store;

pub use entity::{EntitySchema, FieldDef, FieldKind, FieldValue, Record, SchemaBuilder};
pub use error::{CoreError, CoreResult};
pub use identity::{get_id, set_id, with_identity, Entity, Identifiable};
pub use scope::{AllEntities, ByExample, Scope};
pub use store::{
    EntityStore, FromFn, IdGenerator, MemoryStore, Sequence, StoreTransaction, UuidGenerator,
};
