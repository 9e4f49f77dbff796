//! The deterministic impact calculator.
//!
//! Pure functions over validated items: same inputs always yield the same
//! outputs. Summation follows array order, so results are bit-reproducible
//! for the same input ordering. The model is linear in weight and blend
//! share, with no cross-fiber interaction terms.

use std::sync::Arc;

use refio_types::{ContributionItem, ImpactSummary, ItemComposition, ValidationError};

use crate::table::{MaterialFactor, MaterialTable, ReferenceDataset};

/// Computes impact metrics from items and the shared material table.
///
/// All call sites (submission, verification recompute, certificate
/// issuance) go through this one implementation so their figures always
/// agree.
#[derive(Clone, Debug)]
pub struct ImpactCalculator {
    table: Arc<MaterialTable>,
    reference: ReferenceDataset,
}

impl ImpactCalculator {
    pub fn new(table: Arc<MaterialTable>) -> Self {
        Self {
            table,
            reference: ReferenceDataset::empty(),
        }
    }

    /// Attach an enriched reference dataset consulted before the table.
    pub fn with_reference(mut self, reference: ReferenceDataset) -> Self {
        self.reference = reference;
        self
    }

    /// Compute the impact of a single item.
    ///
    /// Validation runs first: a malformed item (bad weight, blend not
    /// summing to 100) is rejected before any arithmetic.
    pub fn item_impact(&self, item: &ContributionItem) -> Result<ImpactSummary, ValidationError> {
        item.validate()?;

        let impact = match &item.composition {
            ItemComposition::Single { material } => self
                .resolve(&item.item_type, material, &item.origin_country)
                .per_kg()
                .scale(item.weight_kg),
            ItemComposition::Mixture { components } => {
                let mut total = ImpactSummary::ZERO;
                for component in components {
                    let share = component.percentage / 100.0;
                    let contribution = self
                        .resolve(&item.item_type, &component.fiber, &item.origin_country)
                        .per_kg()
                        .scale(item.weight_kg * share);
                    total = total.add(&contribution);
                }
                total
            }
        };

        Ok(impact)
    }

    /// Aggregate impact of a contribution: per-item sum in array order.
    pub fn contribution_impact(
        &self,
        items: &[ContributionItem],
    ) -> Result<ImpactSummary, ValidationError> {
        let mut total = ImpactSummary::ZERO;
        for item in items {
            total = total.add(&self.item_impact(item)?);
        }
        Ok(total)
    }

    /// Factor resolution order: exact type+material+country override from
    /// the reference dataset, then material-only table match, then the
    /// default entry.
    fn resolve(&self, item_type: &str, material: &str, origin_country: &str) -> &MaterialFactor {
        if let Some(factor) = self.reference.lookup(item_type, material, origin_country) {
            return factor;
        }
        self.table.resolve(material)
    }
}
