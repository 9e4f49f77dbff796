//! In-memory reference implementation of the contribution store.
//!
//! Deterministic and test-friendly. Production deployments should use a
//! transactional backend for source-of-truth data; the optimistic
//! transition check here is the contract such a backend must honor.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use refio_types::{Contribution, ContributionState, TrackingId};

use crate::error::{StorageError, StorageResult};
use crate::traits::{ContributionStore, QueryWindow};

/// In-memory contribution store.
#[derive(Default)]
pub struct InMemoryContributionStore {
    contributions: RwLock<HashMap<TrackingId, Contribution>>,
}

impl InMemoryContributionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored contributions.
    pub fn len(&self) -> usize {
        self.contributions.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContributionStore for InMemoryContributionStore {
    async fn insert(&self, contribution: Contribution) -> StorageResult<()> {
        let mut guard = self
            .contributions
            .write()
            .map_err(|_| StorageError::Backend("contributions lock poisoned".to_string()))?;

        if guard.contains_key(&contribution.tracking_id) {
            return Err(StorageError::Duplicate(contribution.tracking_id.to_string()));
        }

        guard.insert(contribution.tracking_id.clone(), contribution);
        Ok(())
    }

    async fn get(&self, tracking_id: &TrackingId) -> StorageResult<Option<Contribution>> {
        let guard = self
            .contributions
            .read()
            .map_err(|_| StorageError::Backend("contributions lock poisoned".to_string()))?;
        Ok(guard.get(tracking_id).cloned())
    }

    async fn update_transition(
        &self,
        tracking_id: &TrackingId,
        expected_from: ContributionState,
        updated: Contribution,
    ) -> StorageResult<()> {
        let mut guard = self
            .contributions
            .write()
            .map_err(|_| StorageError::Backend("contributions lock poisoned".to_string()))?;
        let record = guard
            .get_mut(tracking_id)
            .ok_or_else(|| StorageError::NotFound(tracking_id.to_string()))?;

        if record.state != expected_from {
            return Err(StorageError::StaleState {
                tracking_id: tracking_id.to_string(),
                expected: expected_from.to_string(),
                found: record.state.to_string(),
            });
        }

        *record = updated;
        Ok(())
    }

    async fn list(&self, window: QueryWindow) -> StorageResult<Vec<Contribution>> {
        let guard = self
            .contributions
            .read()
            .map_err(|_| StorageError::Backend("contributions lock poisoned".to_string()))?;
        let mut values = guard.values().cloned().collect::<Vec<_>>();
        values.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(apply_window(values, window))
    }
}

fn apply_window(values: Vec<Contribution>, window: QueryWindow) -> Vec<Contribution> {
    let iter = values.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}
