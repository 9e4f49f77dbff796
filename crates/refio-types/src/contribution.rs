//! The contribution aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::certificate::Certificate;
use crate::ids::TrackingId;
use crate::impact::ImpactSummary;
use crate::item::ContributionItem;
use crate::state::{Classification, ContributionState, Destination};

/// Instants at which each lifecycle stage was reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleTimestamps {
    pub received_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub certified_at: Option<DateTime<Utc>>,
}

/// A single donor/seller submission tracked through the lifecycle.
///
/// The aggregate exclusively owns its items, impact figures, and (at most
/// one) certificate. Once the state reaches `certified` the record is
/// append-only: the certificate is set exactly once and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub tracking_id: TrackingId,
    pub subject_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ContributionItem>,
    pub state: ContributionState,
    pub classification: Option<Classification>,
    pub destination: Option<Destination>,
    pub impact: ImpactSummary,
    pub lifecycle: LifecycleTimestamps,
    pub certificate: Option<Certificate>,
}

impl Contribution {
    /// Create a freshly registered contribution.
    ///
    /// Items are expected to be validated and `impact` computed by the
    /// caller (the engine) before construction.
    pub fn register(
        tracking_id: TrackingId,
        subject_name: impl Into<String>,
        items: Vec<ContributionItem>,
        impact: ImpactSummary,
    ) -> Self {
        let now = Utc::now();
        Self {
            tracking_id,
            subject_name: subject_name.into(),
            created_at: now,
            updated_at: now,
            items,
            state: ContributionState::Registered,
            classification: None,
            destination: None,
            impact,
            lifecycle: LifecycleTimestamps::default(),
            certificate: None,
        }
    }

    /// Whether the contribution has issued its certificate.
    pub fn is_certified(&self) -> bool {
        self.state == ContributionState::Certified
    }

    /// Total declared weight across all items.
    pub fn total_weight_kg(&self) -> f64 {
        self.items.iter().map(|i| i.weight_kg).sum()
    }
}
