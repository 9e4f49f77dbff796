//! Contribution items and material composition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance when checking that blend percentages sum to 100.
///
/// Percentages are operator-entered decimals; anything further from 100
/// than this is a data error, never silently normalized.
pub const BLEND_SUM_TOLERANCE: f64 = 1e-6;

/// One fiber share of a blended item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixtureComponent {
    pub fiber: String,
    pub percentage: f64,
}

impl MixtureComponent {
    pub fn new(fiber: impl Into<String>, percentage: f64) -> Self {
        Self {
            fiber: fiber.into(),
            percentage,
        }
    }
}

/// Material composition of an item: a single material or a blend.
///
/// Exactly one variant is ever populated; the serialized form keeps an
/// `is_mixture` discriminant for storage and presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "is_mixture")]
pub enum ItemComposition {
    #[serde(rename = "false")]
    Single { material: String },
    #[serde(rename = "true")]
    Mixture { components: Vec<MixtureComponent> },
}

impl ItemComposition {
    pub fn single(material: impl Into<String>) -> Self {
        Self::Single {
            material: material.into(),
        }
    }

    pub fn mixture(components: Vec<MixtureComponent>) -> Self {
        Self::Mixture { components }
    }

    pub fn is_mixture(&self) -> bool {
        matches!(self, Self::Mixture { .. })
    }
}

/// A single donated or sold textile item within a contribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContributionItem {
    /// Item kind, e.g. "t-shirt", "jeans".
    pub item_type: String,
    #[serde(flatten)]
    pub composition: ItemComposition,
    pub weight_kg: f64,
    pub origin_country: String,
}

impl ContributionItem {
    /// Validate the item before any impact calculation.
    ///
    /// Checks weight positivity, fiber names, per-component percentages,
    /// and that blend percentages sum to exactly 100. Violations identify
    /// the offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(ValidationError::new(
                "weight_kg",
                format!("weight must be positive, got {}", self.weight_kg),
            ));
        }

        match &self.composition {
            ItemComposition::Single { material } => {
                if material.trim().is_empty() {
                    return Err(ValidationError::new("material", "material name is empty"));
                }
            }
            ItemComposition::Mixture { components } => {
                if components.is_empty() {
                    return Err(ValidationError::new(
                        "components",
                        "blend declared with no components",
                    ));
                }
                for (i, component) in components.iter().enumerate() {
                    if component.fiber.trim().is_empty() {
                        return Err(ValidationError::new(
                            format!("components[{i}].fiber"),
                            "fiber name is empty",
                        ));
                    }
                    if !component.percentage.is_finite() || component.percentage <= 0.0 {
                        return Err(ValidationError::new(
                            format!("components[{i}].percentage"),
                            format!("percentage must be positive, got {}", component.percentage),
                        ));
                    }
                }
                let sum: f64 = components.iter().map(|c| c.percentage).sum();
                if (sum - 100.0).abs() > BLEND_SUM_TOLERANCE {
                    return Err(ValidationError::new(
                        "components",
                        format!("blend percentages sum to {sum}, expected 100"),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Malformed input, rejected before any state change.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// The offending field, e.g. `weight_kg` or `components[1].percentage`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
