//! Engine error taxonomy.
//!
//! Every error is a rejected operation, never a crash: a failed guard
//! leaves the stored contribution untouched, and the engine never returns
//! success paired with an inconsistent state.

use thiserror::Error;

use refio_certificate::VerificationOutcome;
use refio_storage::StorageError;
use refio_types::{ContributionState, ValidationError};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Typed errors surfaced by the contribution engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input, identified by the offending field. Rejected
    /// before any state change.
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Attempted state change not allowed from the current state,
    /// including re-certifying an already certified contribution.
    #[error("invalid transition from {from} to {attempted}")]
    InvalidTransition {
        from: ContributionState,
        attempted: ContributionState,
    },

    /// Unknown tracking ID.
    #[error("contribution not found: {0}")]
    NotFound(String),

    /// Another transition won the optimistic-concurrency race. The caller
    /// should re-fetch and retry.
    #[error("concurrent modification on {0}")]
    ConcurrentModification(String),

    /// Certificate hash mismatch. Reported as-is for investigation,
    /// never auto-corrected.
    #[error("certificate integrity violation: computed {computed}, stored {stored}")]
    IntegrityViolation { computed: String, stored: String },

    /// Backend passthrough.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Build an integrity error from a failed verification outcome.
    ///
    /// Returns `None` for a valid outcome.
    pub fn from_verification(outcome: &VerificationOutcome) -> Option<Self> {
        match outcome {
            VerificationOutcome::Valid => None,
            VerificationOutcome::HashMismatch { computed, stored } => {
                Some(Self::IntegrityViolation {
                    computed: computed.clone(),
                    stored: stored.clone(),
                })
            }
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation {
            field: value.field,
            message: value.message,
        }
    }
}

impl From<refio_certificate::CertificateError> for EngineError {
    fn from(value: refio_certificate::CertificateError) -> Self {
        use refio_certificate::CertificateError;
        match value {
            CertificateError::NotVerified(state) => Self::InvalidTransition {
                from: state,
                attempted: ContributionState::Certified,
            },
            CertificateError::MissingField(field) => Self::Validation {
                field: field.to_string(),
                message: "required before certification".to_string(),
            },
        }
    }
}

impl From<StorageError> for EngineError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(id) => Self::NotFound(id),
            StorageError::StaleState { tracking_id, .. } => {
                Self::ConcurrentModification(tracking_id)
            }
            StorageError::Duplicate(msg) => Self::Storage(format!("duplicate tracking id: {msg}")),
            StorageError::Backend(msg) => Self::Storage(msg),
        }
    }
}
