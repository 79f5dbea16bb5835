//! Configuration for the sync engine.

/// Configuration for cold sync passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Report in-scope entities that no operation referenced.
    pub report_remote_entities: bool,
    /// Reject new entities whose provisional identity belongs to an
    /// in-scope entity.
    pub reject_identity_collisions: bool,
}

impl SyncConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            report_remote_entities: true,
            reject_identity_collisions: false,
        }
    }

    /// Sets whether unreferenced in-scope entities are reported.
    pub fn with_report_remote_entities(mut self, report: bool) -> Self {
        self.report_remote_entities = report;
        self
    }

    /// Sets whether provisional identity collisions abort the pass.
    pub fn with_reject_identity_collisions(mut self, reject: bool) -> Self {
        self.reject_identity_collisions = reject;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
