use thiserror::Error;

/// Result type for contribution-store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Contribution-store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("contribution not found: {0}")]
    NotFound(String),

    /// Insert of a tracking ID that already exists. Tracking IDs are
    /// effectively collision-free, so this usually means a double submit.
    #[error("duplicate tracking id: {0}")]
    Duplicate(String),

    /// Optimistic-concurrency conflict: the stored state no longer matches
    /// what the caller read. Re-fetch and retry.
    #[error("stale state for {tracking_id}: expected {expected}, found {found}")]
    StaleState {
        tracking_id: String,
        expected: String,
        found: String,
    },

    #[error("backend error: {0}")]
    Backend(String),
}
