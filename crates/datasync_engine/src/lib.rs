//! # Datasync Engine
//!
//! Cold sync engine for datasync.
//!
//! This crate provides:
//! - [`SyncableDataSet`], which reconciles a batch of client operations
//!   against the entities selected by a scope
//! - [`SyncConfig`] for pass behavior
//! - [`SyncStats`] and [`ColdSyncReport`] describing a finished pass
//!
//! ## Architecture
//!
//! A pass is a single synchronous call against a store handle the caller
//! owns exclusively:
//! 1. Load the in-scope entities
//! 2. Validate every operation before the first write
//! 3. Persist new entities, merge or reject existing ones
//! 4. Report in-scope entities no operation referenced
//!
//! ## Key Invariants
//!
//! - Responses follow operation order, then scope order
//! - A conflict never writes
//! - A rejected request writes nothing
//! - Commit and rollback belong to the caller

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dataset;
mod error;
mod stats;

pub use config::SyncConfig;
pub use dataset::SyncableDataSet;
pub use error::{SyncError, SyncResult};
pub use stats::{ColdSyncReport, SyncStats};
