//! The immutable, hash-bound certificate record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TrackingId;
use crate::impact::ImpactSummary;
use crate::state::{Classification, Destination};

/// Hash-bound snapshot of a contribution's final impact and classification.
///
/// Issued exactly once, when the contribution reaches `certified`, and
/// never mutated afterwards. `content_hash` is the SHA-256 digest of the
/// canonical serialization of every other field; altering any visible
/// field without recomputing the hash makes verification fail. Impact
/// figures are frozen in at issuance, so later changes to the material
/// factor table do not affect already-issued certificates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub tracking_id: TrackingId,
    pub subject_name: String,
    pub classification: Classification,
    pub destination: Destination,
    pub impact: ImpactSummary,
    pub issued_at: DateTime<Utc>,
    pub issuer: String,
    /// Hex-encoded SHA-256 over the canonical content.
    pub content_hash: String,
}
