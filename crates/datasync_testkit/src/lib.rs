//! # Datasync Testkit
//!
//! Test utilities for datasync.
//!
//! This crate provides:
//! - `SimpleEntity`, seeded stores and record fixtures
//! - Property-based test generators using proptest
//! - Tracing initialization for test output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use datasync_testkit::prelude::*;
//!
//! #[test]
//! fn remote_entities_are_reported() {
//!     init_tracing();
//!     let (store, seeded) = seeded_store(vec![SimpleEntity::new("remote", 0, 1)]);
//!     // ... sync against store
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::init_tracing;
}

pub use fixtures::*;
pub use generators::*;
pub use logging::init_tracing;
