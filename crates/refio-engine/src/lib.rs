//! Refio contribution lifecycle engine.
//!
//! Owns the lifecycle of contribution records: guarded state transitions
//! from `registered` through `certified`, impact recomputation when the
//! classification step corrects the item list, and exactly-once
//! certificate issuance. The engine is the only writer; it persists
//! through the [`ContributionStore`] seam, and every transition follows
//! read → guard → conditional write so concurrent operators on the same
//! contribution serialize instead of overwriting each other.

#![deny(unsafe_code)]

pub mod config;
pub mod error;

use std::sync::Arc;

use chrono::Utc;

use refio_certificate::VerificationOutcome;
use refio_impact::ImpactCalculator;
use refio_storage::{ContributionStore, QueryWindow};
use refio_types::{
    Certificate, Classification, Contribution, ContributionItem, ContributionState, ImpactSummary,
    TrackingId,
};

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};

/// The contribution lifecycle engine.
///
/// All computation is synchronous and pure; the async boundary exists
/// only at the persistence calls.
pub struct ContributionEngine {
    store: Arc<dyn ContributionStore>,
    calculator: ImpactCalculator,
    config: EngineConfig,
}

impl ContributionEngine {
    pub fn new(store: Arc<dyn ContributionStore>, calculator: ImpactCalculator) -> Self {
        Self::with_config(store, calculator, EngineConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn ContributionStore>,
        calculator: ImpactCalculator,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            calculator,
            config,
        }
    }

    /// Submit a new contribution.
    ///
    /// Validates every item, computes the aggregate impact, assigns a
    /// fresh tracking ID, and persists the record in state `registered`.
    pub async fn submit(
        &self,
        subject_name: impl Into<String>,
        items: Vec<ContributionItem>,
    ) -> EngineResult<Contribution> {
        let impact = self.calculator.contribution_impact(&items)?;
        let contribution =
            Contribution::register(TrackingId::generate(), subject_name, items, impact);

        self.store.insert(contribution.clone()).await?;
        tracing::info!(
            tracking_id = %contribution.tracking_id,
            items = contribution.items.len(),
            "contribution registered"
        );
        Ok(contribution)
    }

    /// Record physical receipt of the contribution.
    ///
    /// Guard: at least one item with positive weight.
    pub async fn mark_received(&self, tracking_id: &TrackingId) -> EngineResult<Contribution> {
        let mut contribution = self.fetch(tracking_id).await?;
        self.guard_advance(&contribution, ContributionState::Received)?;

        if !contribution.items.iter().any(|i| i.weight_kg > 0.0) {
            return Err(EngineError::Validation {
                field: "items".to_string(),
                message: "at least one item with positive weight is required".to_string(),
            });
        }

        let now = Utc::now();
        contribution.state = ContributionState::Received;
        contribution.lifecycle.received_at = Some(now);
        contribution.updated_at = now;

        self.store
            .update_transition(tracking_id, ContributionState::Registered, contribution.clone())
            .await?;
        tracing::info!(tracking_id = %tracking_id, "contribution received");
        Ok(contribution)
    }

    /// Record operator verification.
    ///
    /// The operator supplies the classification and, optionally, the item
    /// list as corrected during physical verification. The destination is
    /// derived from the classification and the impact is recomputed from
    /// the final items.
    pub async fn mark_verified(
        &self,
        tracking_id: &TrackingId,
        classification: Classification,
        corrected_items: Option<Vec<ContributionItem>>,
    ) -> EngineResult<Contribution> {
        let mut contribution = self.fetch(tracking_id).await?;
        self.guard_advance(&contribution, ContributionState::Verified)?;

        let items = corrected_items.unwrap_or_else(|| contribution.items.clone());
        let impact = self.calculator.contribution_impact(&items)?;

        let now = Utc::now();
        contribution.items = items;
        contribution.impact = impact;
        contribution.classification = Some(classification);
        contribution.destination = Some(classification.destination());
        contribution.state = ContributionState::Verified;
        contribution.lifecycle.verified_at = Some(now);
        contribution.updated_at = now;

        self.store
            .update_transition(tracking_id, ContributionState::Received, contribution.clone())
            .await?;
        tracing::info!(
            tracking_id = %tracking_id,
            classification = %classification,
            "contribution verified"
        );
        Ok(contribution)
    }

    /// Issue the certificate and move the contribution to `certified`.
    ///
    /// Idempotency: calling this on an already certified contribution is
    /// rejected with `InvalidTransition` and the stored certificate, hash
    /// included, is left untouched.
    pub async fn certify(&self, tracking_id: &TrackingId) -> EngineResult<Contribution> {
        let mut contribution = self.fetch(tracking_id).await?;
        self.guard_advance(&contribution, ContributionState::Certified)?;

        let certificate =
            refio_certificate::generate(&contribution, self.config.issuer_identity.clone())?;

        let now = Utc::now();
        contribution.certificate = Some(certificate);
        contribution.state = ContributionState::Certified;
        contribution.lifecycle.certified_at = Some(now);
        contribution.updated_at = now;

        self.store
            .update_transition(tracking_id, ContributionState::Verified, contribution.clone())
            .await?;
        tracing::info!(tracking_id = %tracking_id, "contribution certified");
        Ok(contribution)
    }

    /// Fetch a contribution, impact and certificate included.
    pub async fn fetch(&self, tracking_id: &TrackingId) -> EngineResult<Contribution> {
        self.store
            .get(tracking_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(tracking_id.to_string()))
    }

    /// Re-check a certificate against its content hash.
    ///
    /// Pure; callable on certificates presented by third parties. A
    /// mismatch is reported with both digests and is never auto-corrected
    /// (see [`EngineError::from_verification`] for the typed form).
    pub fn verify_certificate(&self, certificate: &Certificate) -> VerificationOutcome {
        let outcome = refio_certificate::verify(certificate);
        if let VerificationOutcome::HashMismatch { computed, stored } = &outcome {
            tracing::warn!(
                tracking_id = %certificate.tracking_id,
                computed = %computed,
                stored = %stored,
                "certificate failed integrity check"
            );
        }
        outcome
    }

    /// List contributions newest-first.
    pub async fn list(&self, window: QueryWindow) -> EngineResult<Vec<Contribution>> {
        Ok(self.store.list(window).await?)
    }

    /// Aggregate statistics for operator dashboards.
    pub async fn statistics(&self) -> EngineResult<EngineStatistics> {
        let contributions = self.store.list(QueryWindow::default()).await?;

        let mut stats = EngineStatistics::default();
        for contribution in &contributions {
            stats.total += 1;
            match contribution.state {
                ContributionState::Registered => stats.registered += 1,
                ContributionState::Received => stats.received += 1,
                ContributionState::Verified => stats.verified += 1,
                ContributionState::Certified => {
                    stats.certified += 1;
                    stats.certified_impact = stats.certified_impact.add(&contribution.impact);
                }
            }
        }
        Ok(stats)
    }

    /// Check that the contribution may advance directly to `target`.
    fn guard_advance(
        &self,
        contribution: &Contribution,
        target: ContributionState,
    ) -> EngineResult<()> {
        if !contribution.state.can_advance_to(target) {
            return Err(EngineError::InvalidTransition {
                from: contribution.state,
                attempted: target,
            });
        }
        Ok(())
    }
}

/// Counts by state plus the impact total across certified contributions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineStatistics {
    pub total: usize,
    pub registered: usize,
    pub received: usize,
    pub verified: usize,
    pub certified: usize,
    pub certified_impact: ImpactSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use refio_impact::MaterialTable;
    use refio_storage::InMemoryContributionStore;
    use refio_types::{ItemComposition, MixtureComponent};

    fn engine() -> ContributionEngine {
        ContributionEngine::new(
            Arc::new(InMemoryContributionStore::new()),
            ImpactCalculator::new(Arc::new(MaterialTable::builtin())),
        )
    }

    fn cotton_shirt(weight_kg: f64) -> ContributionItem {
        ContributionItem {
            item_type: "t-shirt".to_string(),
            composition: ItemComposition::single("Algodão"),
            weight_kg,
            origin_country: "PT".to_string(),
        }
    }

    #[tokio::test]
    async fn submit_registers_with_computed_impact() {
        let engine = engine();
        let contribution = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();

        assert_eq!(contribution.state, ContributionState::Registered);
        assert!((contribution.impact.co2_saved_kg - 0.75).abs() < 1e-12);
        assert!((contribution.impact.water_saved_l - 450.0).abs() < 1e-12);

        let fetched = engine.fetch(&contribution.tracking_id).await.unwrap();
        assert_eq!(fetched, contribution);
    }

    #[tokio::test]
    async fn submit_rejects_invalid_blend_before_any_state_change() {
        let engine = engine();
        let err = engine
            .submit(
                "Maria Silva",
                vec![ContributionItem {
                    item_type: "jeans".to_string(),
                    composition: ItemComposition::mixture(vec![
                        MixtureComponent::new("Algodão", 60.0),
                        MixtureComponent::new("Poliéster", 30.0),
                    ]),
                    weight_kg: 1.0,
                    origin_country: "PT".to_string(),
                }],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation { ref field, .. } if field == "components"));
        assert!(engine.list(QueryWindow::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_lifecycle_reaches_certified_with_valid_certificate() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();
        let id = submitted.tracking_id.clone();

        let received = engine.mark_received(&id).await.unwrap();
        assert!(received.lifecycle.received_at.is_some());

        let verified = engine
            .mark_verified(&id, Classification::Reusable, None)
            .await
            .unwrap();
        assert_eq!(verified.classification, Some(Classification::Reusable));
        assert_eq!(
            verified.destination,
            Some(refio_types::Destination::MarketplaceOrDonation)
        );

        let certified = engine.certify(&id).await.unwrap();
        assert!(certified.is_certified());
        let certificate = certified.certificate.expect("certificate must be issued");
        assert!(engine.verify_certificate(&certificate).is_valid());
        assert_eq!(certificate.impact, certified.impact);
    }

    #[tokio::test]
    async fn skipping_received_is_an_invalid_transition() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();

        let err = engine
            .mark_verified(&submitted.tracking_id, Classification::Reusable, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: ContributionState::Registered,
                attempted: ContributionState::Verified,
            }
        ));

        // Nothing changed.
        let stored = engine.fetch(&submitted.tracking_id).await.unwrap();
        assert_eq!(stored.state, ContributionState::Registered);
        assert!(stored.classification.is_none());
    }

    #[tokio::test]
    async fn certify_from_received_is_rejected_and_state_unchanged() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();
        let id = submitted.tracking_id.clone();
        engine.mark_received(&id).await.unwrap();

        let err = engine.certify(&id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: ContributionState::Received,
                attempted: ContributionState::Certified,
            }
        ));
        let stored = engine.fetch(&id).await.unwrap();
        assert_eq!(stored.state, ContributionState::Received);
        assert!(stored.certificate.is_none());
    }

    #[tokio::test]
    async fn second_certify_is_rejected_and_hash_unchanged() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();
        let id = submitted.tracking_id.clone();
        engine.mark_received(&id).await.unwrap();
        engine
            .mark_verified(&id, Classification::Repairable, None)
            .await
            .unwrap();

        let certified = engine.certify(&id).await.unwrap();
        let first_hash = certified.certificate.unwrap().content_hash;

        let err = engine.certify(&id).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));

        let stored = engine.fetch(&id).await.unwrap();
        assert_eq!(stored.certificate.unwrap().content_hash, first_hash);
    }

    #[tokio::test]
    async fn corrected_items_recompute_impact_at_verification() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();
        let id = submitted.tracking_id.clone();
        engine.mark_received(&id).await.unwrap();

        // Physical verification finds the shirt actually weighs 0.6 kg.
        let verified = engine
            .mark_verified(&id, Classification::Reusable, Some(vec![cotton_shirt(0.6)]))
            .await
            .unwrap();

        assert!((verified.impact.co2_saved_kg - 1.5).abs() < 1e-12);
        assert!((verified.impact.water_saved_l - 900.0).abs() < 1e-12);
        assert_eq!(verified.items[0].weight_kg, 0.6);
    }

    #[tokio::test]
    async fn unknown_tracking_id_is_not_found() {
        let engine = engine();
        let missing = TrackingId::new("REF-00000000000000-000000000000");

        let err = engine.fetch(&missing).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = engine.mark_received(&missing).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn tampered_certificate_fails_engine_verification() {
        let engine = engine();
        let submitted = engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();
        let id = submitted.tracking_id.clone();
        engine.mark_received(&id).await.unwrap();
        engine
            .mark_verified(&id, Classification::Recyclable, None)
            .await
            .unwrap();
        let certified = engine.certify(&id).await.unwrap();

        let mut certificate = certified.certificate.unwrap();
        certificate.impact.co2_saved_kg *= 10.0;

        let outcome = engine.verify_certificate(&certificate);
        assert!(!outcome.is_valid());
        let err = EngineError::from_verification(&outcome).unwrap();
        assert!(matches!(err, EngineError::IntegrityViolation { .. }));
    }

    #[tokio::test]
    async fn statistics_count_states_and_sum_certified_impact() {
        let engine = engine();

        // One contribution left registered.
        engine
            .submit("Maria Silva", vec![cotton_shirt(0.3)])
            .await
            .unwrap();

        // One taken all the way to certified.
        let second = engine
            .submit("João Costa", vec![cotton_shirt(1.0)])
            .await
            .unwrap();
        let id = second.tracking_id.clone();
        engine.mark_received(&id).await.unwrap();
        engine
            .mark_verified(&id, Classification::Reusable, None)
            .await
            .unwrap();
        let certified = engine.certify(&id).await.unwrap();

        let stats = engine.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.registered, 1);
        assert_eq!(stats.certified, 1);
        assert_eq!(stats.certified_impact, certified.impact);
    }

    #[derive(Clone, Debug)]
    enum LifecycleOp {
        Receive,
        Verify,
        Certify,
    }

    fn op_strategy() -> impl Strategy<Value = Vec<LifecycleOp>> {
        proptest::collection::vec(
            prop_oneof![
                Just(LifecycleOp::Receive),
                Just(LifecycleOp::Verify),
                Just(LifecycleOp::Certify),
            ],
            0..12,
        )
    }

    proptest! {
        #[test]
        fn arbitrary_op_sequences_never_break_lifecycle_order(ops in op_strategy()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");

            rt.block_on(async move {
                let engine = engine();
                let submitted = engine
                    .submit("prop-subject", vec![cotton_shirt(0.5)])
                    .await
                    .expect("submit");
                let id = submitted.tracking_id.clone();

                for op in ops {
                    // Rejected operations must leave the record coherent.
                    let _ = match op {
                        LifecycleOp::Receive => engine.mark_received(&id).await,
                        LifecycleOp::Verify => {
                            engine
                                .mark_verified(&id, Classification::Reusable, None)
                                .await
                        }
                        LifecycleOp::Certify => engine.certify(&id).await,
                    };

                    let stored = engine.fetch(&id).await.expect("fetch");
                    match stored.state {
                        ContributionState::Registered => {
                            assert!(stored.classification.is_none());
                            assert!(stored.certificate.is_none());
                        }
                        ContributionState::Received => {
                            assert!(stored.certificate.is_none());
                        }
                        ContributionState::Verified => {
                            assert!(stored.classification.is_some());
                            assert!(stored.destination.is_some());
                            assert!(stored.certificate.is_none());
                        }
                        ContributionState::Certified => {
                            let certificate =
                                stored.certificate.as_ref().expect("certificate");
                            assert!(refio_certificate::verify(certificate).is_valid());
                        }
                    }
                }
            });
        }
    }
}
