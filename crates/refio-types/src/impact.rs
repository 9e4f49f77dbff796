//! Derived environmental-impact metrics.

use serde::{Deserialize, Serialize};

/// Aggregate environmental impact of an item or contribution.
///
/// All three metrics are derived by the impact calculator, never entered
/// directly, and scale linearly with item weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// CO₂ saved, in kilograms.
    pub co2_saved_kg: f64,
    /// Water saved, in liters.
    pub water_saved_l: f64,
    /// Resource-saving share, weight-scaled percent points.
    pub resource_saving_percent: f64,
}

impl ImpactSummary {
    pub const ZERO: ImpactSummary = ImpactSummary {
        co2_saved_kg: 0.0,
        water_saved_l: 0.0,
        resource_saving_percent: 0.0,
    };

    pub fn new(co2_saved_kg: f64, water_saved_l: f64, resource_saving_percent: f64) -> Self {
        Self {
            co2_saved_kg,
            water_saved_l,
            resource_saving_percent,
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &ImpactSummary) -> ImpactSummary {
        ImpactSummary {
            co2_saved_kg: self.co2_saved_kg + other.co2_saved_kg,
            water_saved_l: self.water_saved_l + other.water_saved_l,
            resource_saving_percent: self.resource_saving_percent + other.resource_saving_percent,
        }
    }

    /// Component-wise scaling, used for weight and blend shares.
    pub fn scale(&self, factor: f64) -> ImpactSummary {
        ImpactSummary {
            co2_saved_kg: self.co2_saved_kg * factor,
            water_saved_l: self.water_saved_l * factor,
            resource_saving_percent: self.resource_saving_percent * factor,
        }
    }
}
