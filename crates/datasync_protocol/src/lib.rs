//! # Datasync Protocol
//!
//! Sync protocol types and CBOR codecs for datasync.
//!
//! This crate provides:
//! - [`SyncOperation`] for client-proposed changes (new or existing)
//! - [`SyncResponse`] for the per-operation outcomes of a sync pass
//! - [`ConflictDetector`] for expected-state comparison
//! - CBOR encoding/decoding of operation and response batches
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod conflict;
mod error;
mod operation;
mod response;

pub use codec::PROTOCOL_VERSION;
pub use conflict::{ConflictDetector, Verdict};
pub use error::{ProtocolError, ProtocolResult};
pub use operation::{OperationKind, SyncOperation};
pub use response::{ResponseKind, SyncResponse};
