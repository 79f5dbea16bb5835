//! Pass statistics and reports.

use datasync_core::Identifiable;
use datasync_protocol::SyncResponse;
use std::time::Duration;

/// Counters describing one cold sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Operations in the request.
    pub operations: usize,
    /// New entities persisted.
    pub persisted: usize,
    /// New entities whose identity changed.
    pub id_changes: usize,
    /// Existing entities updated.
    pub merged: usize,
    /// Existing operations that changed nothing.
    pub unchanged: usize,
    /// Existing operations rejected as conflicts.
    pub conflicts: usize,
    /// Unreferenced in-scope entities reported.
    pub remote_new: usize,
    /// Wall time of the pass.
    pub elapsed: Duration,
}

impl SyncStats {
    /// Returns the number of store writes made.
    pub fn writes(&self) -> usize {
        self.persisted + self.merged
    }
}

/// Responses of a pass together with its statistics.
#[derive(Debug, Clone)]
pub struct ColdSyncReport<E: Identifiable> {
    /// Responses in order.
    pub responses: Vec<SyncResponse<E>>,
    /// Pass statistics.
    pub stats: SyncStats,
}

impl<E: Identifiable> ColdSyncReport<E> {
    /// Returns the conflict responses.
    pub fn conflicts(&self) -> impl Iterator<Item = &SyncResponse<E>> {
        self.responses.iter().filter(|r| r.is_conflict())
    }

    /// Returns true if no operation conflicted.
    pub fn is_clean(&self) -> bool {
        self.stats.conflicts == 0
    }

    /// Consumes the report, returning the responses.
    pub fn into_responses(self) -> Vec<SyncResponse<E>> {
        self.responses
    }
}
