use async_trait::async_trait;

use refio_types::{Contribution, ContributionState, TrackingId};

use crate::error::StorageResult;

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    /// Maximum records to return; 0 means no limit.
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for contribution records.
///
/// The store of record serializes transitions on a single tracking ID:
/// [`update_transition`](ContributionStore::update_transition) writes only
/// if the stored state still equals the state the caller observed, and
/// rejects with [`StorageError::StaleState`](crate::StorageError) instead
/// of silently overwriting. Transitions on different contributions are
/// independent and may proceed in parallel.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    /// Insert a freshly registered contribution.
    ///
    /// Rejects a duplicate tracking ID, which is what makes the ID safe
    /// to rely on as the primary lookup key.
    async fn insert(&self, contribution: Contribution) -> StorageResult<()>;

    /// Get one contribution by tracking ID.
    async fn get(&self, tracking_id: &TrackingId) -> StorageResult<Option<Contribution>>;

    /// Replace a contribution as part of a state transition.
    ///
    /// `expected_from` is the state the caller observed before applying
    /// its guard; the write succeeds only if the stored state still
    /// matches.
    async fn update_transition(
        &self,
        tracking_id: &TrackingId,
        expected_from: ContributionState,
        updated: Contribution,
    ) -> StorageResult<()>;

    /// List contributions newest-first by `updated_at`.
    async fn list(&self, window: QueryWindow) -> StorageResult<Vec<Contribution>>;
}
