//! Cold sync over a scoped data set.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::stats::{ColdSyncReport, SyncStats};
use datasync_core::{CoreError, Entity, EntityStore, Scope};
use datasync_protocol::{codec, ConflictDetector, SyncOperation, SyncResponse, Verdict};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// The set of entities selected by a scope, synchronized as a unit.
///
/// Each call to [`cold_sync`](Self::cold_sync) is a full, stateless
/// reconciliation pass: the scope is read, every operation is applied or
/// rejected, and in-scope entities the client did not mention are reported
/// back to it.
///
/// The pass writes through the store handle it is given and never commits.
/// Run it inside a transaction and commit once the responses are in hand;
/// if the pass fails, roll back.
///
/// # Example
///
/// ```rust,ignore
/// let data_set = SyncableDataSet::from(|n: &Note| n.owner == "alice");
///
/// let mut txn = store.begin();
/// let responses = data_set.cold_sync(&mut txn, operations)?;
/// txn.commit();
/// ```
#[derive(Debug, Clone)]
pub struct SyncableDataSet<E, Q> {
    scope: Q,
    config: SyncConfig,
    _entity: PhantomData<fn(&E)>,
}

impl<E: Entity, Q: Scope<E>> SyncableDataSet<E, Q> {
    /// Creates a data set over `scope` with the default configuration.
    pub fn new(scope: Q) -> Self {
        Self::with_config(scope, SyncConfig::default())
    }

    /// Creates a data set over `scope`.
    pub fn with_config(scope: Q, config: SyncConfig) -> Self {
        Self {
            scope,
            config,
            _entity: PhantomData,
        }
    }

    /// Returns the scope.
    pub fn scope(&self) -> &Q {
        &self.scope
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs a cold sync pass and returns the responses.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the request is malformed, and
    /// with [`SyncError::Store`] if the store fails. A store failure can
    /// happen after earlier writes; the caller must roll back.
    pub fn cold_sync<S>(
        &self,
        store: &mut S,
        operations: Vec<SyncOperation<E>>,
    ) -> SyncResult<Vec<SyncResponse<E>>>
    where
        S: EntityStore<E>,
    {
        Ok(self.reconcile(store, operations)?.into_responses())
    }

    /// Runs a cold sync pass and returns the responses with statistics.
    ///
    /// # Errors
    ///
    /// Same as [`cold_sync`](Self::cold_sync).
    pub fn reconcile<S>(
        &self,
        store: &mut S,
        operations: Vec<SyncOperation<E>>,
    ) -> SyncResult<ColdSyncReport<E>>
    where
        S: EntityStore<E>,
    {
        let started = Instant::now();
        let span = info_span!("cold_sync", operations = operations.len());
        let _enter = span.enter();

        let mut order = Vec::new();
        let mut in_scope = BTreeMap::new();
        for entity in store.select(&self.scope)? {
            if let Some(id) = entity.identity() {
                order.push(id.clone());
                in_scope.insert(id, entity);
            }
        }
        debug!(in_scope = in_scope.len(), "scope loaded");

        self.preflight(&operations, &in_scope)?;

        let mut stats = SyncStats {
            operations: operations.len(),
            ..SyncStats::default()
        };
        let mut seen = BTreeSet::new();
        let mut responses = Vec::new();

        for (index, operation) in operations.into_iter().enumerate() {
            match operation {
                SyncOperation::New { proposed } => {
                    let provisional = proposed.identity();
                    let saved = store.persist(proposed)?;
                    let final_id = saved.identity().ok_or_else(|| {
                        CoreError::invalid_operation("store persisted an entity without identity")
                    })?;
                    if in_scope.contains_key(&final_id) || !seen.insert(final_id.clone()) {
                        return Err(CoreError::duplicate_identity(&final_id).into());
                    }
                    stats.persisted += 1;

                    if provisional.as_ref() == Some(&final_id) {
                        debug!(index, id = ?final_id, "new entity kept its identity");
                    } else {
                        debug!(index, old_id = ?provisional, id = ?final_id, "new entity assigned identity");
                        stats.id_changes += 1;
                        responses.push(SyncResponse::id_change(provisional, saved));
                    }
                }
                SyncOperation::Existing { proposed, expected } => {
                    let id = proposed
                        .identity()
                        .ok_or(SyncError::MissingIdentity { index })?;
                    let current = in_scope
                        .get(&id)
                        .ok_or_else(|| SyncError::not_in_scope(index, &id))?;
                    seen.insert(id.clone());

                    match ConflictDetector::detect(&expected, current) {
                        Verdict::Unchanged if ConflictDetector::same_values(&proposed, current) => {
                            debug!(index, id = ?id, "existing entity unchanged");
                            stats.unchanged += 1;
                        }
                        Verdict::Unchanged => {
                            store.merge(&id, &proposed)?;
                            debug!(index, id = ?id, "existing entity merged");
                            stats.merged += 1;
                        }
                        Verdict::Diverged => {
                            warn!(index, id = ?id, "conflict: server state differs from expected");
                            stats.conflicts += 1;
                            responses.push(SyncResponse::conflict(
                                expected,
                                proposed,
                                current.clone(),
                            ));
                        }
                    }
                }
            }
        }

        if self.config.report_remote_entities {
            for id in order {
                if seen.contains(&id) {
                    continue;
                }
                if let Some(entity) = in_scope.remove(&id) {
                    debug!(id = ?id, "reporting unreferenced entity");
                    stats.remote_new += 1;
                    responses.push(SyncResponse::new_remote(entity));
                }
            }
        }

        stats.elapsed = started.elapsed();
        info!(
            persisted = stats.persisted,
            id_changes = stats.id_changes,
            merged = stats.merged,
            unchanged = stats.unchanged,
            conflicts = stats.conflicts,
            remote_new = stats.remote_new,
            elapsed_us = u64::try_from(stats.elapsed.as_micros()).unwrap_or(u64::MAX),
            "cold sync finished"
        );

        Ok(ColdSyncReport { responses, stats })
    }

    /// Decodes a CBOR request batch, runs a pass and encodes the responses.
    ///
    /// # Errors
    ///
    /// Fails with [`SyncError::Codec`] on a malformed batch, otherwise as
    /// [`cold_sync`](Self::cold_sync).
    pub fn cold_sync_cbor<S>(&self, store: &mut S, request: &[u8]) -> SyncResult<Vec<u8>>
    where
        S: EntityStore<E>,
        E: Serialize + DeserializeOwned,
        E::Id: Serialize,
    {
        let operations = codec::decode_operations(request)?;
        let responses = self.cold_sync(store, operations)?;
        Ok(codec::encode_responses(&responses)?)
    }

    /// Rejects a malformed request before anything is written.
    fn preflight(
        &self,
        operations: &[SyncOperation<E>],
        in_scope: &BTreeMap<E::Id, E>,
    ) -> SyncResult<()> {
        let mut referenced = BTreeMap::new();

        for (index, operation) in operations.iter().enumerate() {
            match operation {
                SyncOperation::New { proposed } => {
                    if !self.config.reject_identity_collisions {
                        continue;
                    }
                    if let Some(id) = proposed.identity() {
                        if in_scope.contains_key(&id) {
                            return Err(SyncError::identity_collision(index, &id));
                        }
                    }
                }
                SyncOperation::Existing { proposed, expected } => {
                    let id = proposed
                        .identity()
                        .ok_or(SyncError::MissingIdentity { index })?;
                    let expected_id = expected.identity();
                    if expected_id.as_ref() != Some(&id) {
                        return Err(SyncError::identity_mismatch(index, &id, &expected_id));
                    }
                    if !in_scope.contains_key(&id) {
                        return Err(SyncError::not_in_scope(index, &id));
                    }
                    if let Some(first) = referenced.insert(id.clone(), index) {
                        return Err(SyncError::duplicate_reference(&id, first, index));
                    }
                }
            }
        }

        Ok(())
    }
}

impl<E: Entity, Q: Scope<E>> From<Q> for SyncableDataSet<E, Q> {
    fn from(scope: Q) -> Self {
        Self::new(scope)
    }
}
