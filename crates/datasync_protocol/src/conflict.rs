//! Conflict detection.
//!
//! Conflicts are detected by comparing the state a client expected with the
//! state the server actually holds, using full value equality. No version
//! column is involved, so a concurrent change that restores the exact
//! expected values goes unnoticed.

use datasync_core::{with_identity, Identifiable};
use std::fmt;

/// Result of comparing an expected state with the actual one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The server still holds exactly what the client expected.
    Unchanged,
    /// The server state diverged; applying the change would lose data.
    Diverged,
}

impl Verdict {
    /// Returns true for [`Verdict::Diverged`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Verdict::Diverged)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Unchanged => f.write_str("unchanged"),
            Verdict::Diverged => f.write_str("diverged"),
        }
    }
}

/// Structural comparison of entity states.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Returns true if `expected` and `actual` are equal in every persisted
    /// field, identity included.
    pub fn matches<E: PartialEq>(expected: &E, actual: &E) -> bool {
        expected == actual
    }

    /// Returns true if `a` and `b` are equal in every persisted field
    /// other than identity.
    ///
    /// Tells whether a proposed state carries any value change, and lets
    /// callers compare a freshly persisted entity with the provisional copy
    /// they sent.
    pub fn same_values<E>(a: &E, b: &E) -> bool
    where
        E: Identifiable + Clone + PartialEq,
    {
        with_identity(a, None) == with_identity(b, None)
    }

    /// Classifies the actual server state against the expected one.
    pub fn detect<E: PartialEq>(expected: &E, actual: &E) -> Verdict {
        if Self::matches(expected, actual) {
            Verdict::Unchanged
        } else {
            Verdict::Diverged
        }
    }
}
