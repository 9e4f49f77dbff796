//! Static lookup of per-material environmental factors.
//!
//! The table is immutable after construction and safe to share across any
//! number of concurrent calculator invocations. Material names are matched
//! case-insensitively by substring against a fixed category→materials map;
//! a `default` entry always exists and is used when nothing matches, so
//! missing reference data degrades gracefully instead of blocking a
//! submission.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use refio_types::ImpactSummary;

/// Environmental factors for one material category, per kilogram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialFactor {
    pub co2_per_kg: f64,
    pub water_per_kg: f64,
    pub resource_saving_percent: f64,
}

impl MaterialFactor {
    pub const fn new(co2_per_kg: f64, water_per_kg: f64, resource_saving_percent: f64) -> Self {
        Self {
            co2_per_kg,
            water_per_kg,
            resource_saving_percent,
        }
    }

    /// The impact of one kilogram of this material.
    pub fn per_kg(&self) -> ImpactSummary {
        ImpactSummary::new(self.co2_per_kg, self.water_per_kg, self.resource_saving_percent)
    }
}

/// One category with its factor and the material names that resolve to it.
#[derive(Clone, Debug)]
pub struct MaterialCategory {
    pub name: &'static str,
    /// Lowercase material names, Portuguese and English.
    pub materials: &'static [&'static str],
    pub factor: MaterialFactor,
}

/// The material impact table: ordered categories plus the default factor.
///
/// Category order is fixed; the first matching category wins, which keeps
/// resolution deterministic for ambiguous names.
#[derive(Clone, Debug)]
pub struct MaterialTable {
    categories: Vec<MaterialCategory>,
    default_factor: MaterialFactor,
}

/// Fallback factors applied when no category matches.
const DEFAULT_FACTOR: MaterialFactor = MaterialFactor::new(2.0, 800.0, 25.0);

const BUILTIN_CATEGORIES: &[MaterialCategory] = &[
    MaterialCategory {
        name: "cotton",
        materials: &["algodão", "algodao", "cotton"],
        factor: MaterialFactor::new(2.5, 1500.0, 30.0),
    },
    MaterialCategory {
        name: "polyester",
        materials: &["poliéster", "poliester", "polyester"],
        factor: MaterialFactor::new(3.0, 100.0, 45.0),
    },
    MaterialCategory {
        name: "wool",
        materials: &["lã", "wool", "merino"],
        factor: MaterialFactor::new(5.4, 500.0, 35.0),
    },
    MaterialCategory {
        name: "linen",
        materials: &["linho", "linen", "flax"],
        factor: MaterialFactor::new(1.7, 650.0, 28.0),
    },
    MaterialCategory {
        name: "viscose",
        materials: &["viscose", "rayon", "modal", "lyocell"],
        factor: MaterialFactor::new(2.2, 400.0, 32.0),
    },
    MaterialCategory {
        name: "nylon",
        materials: &["nylon", "poliamida", "polyamide"],
        factor: MaterialFactor::new(5.5, 150.0, 40.0),
    },
    MaterialCategory {
        name: "acrylic",
        materials: &["acrílico", "acrilico", "acrylic"],
        factor: MaterialFactor::new(5.0, 120.0, 38.0),
    },
    MaterialCategory {
        name: "silk",
        materials: &["seda", "silk"],
        factor: MaterialFactor::new(7.6, 1000.0, 25.0),
    },
    MaterialCategory {
        name: "elastane",
        materials: &["elastano", "elastane", "spandex", "lycra"],
        factor: MaterialFactor::new(4.6, 130.0, 36.0),
    },
    MaterialCategory {
        name: "denim",
        materials: &["denim", "ganga", "jeans"],
        factor: MaterialFactor::new(3.4, 2000.0, 33.0),
    },
];

impl MaterialTable {
    /// Load the built-in category→materials map.
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN_CATEGORIES.to_vec(),
            default_factor: DEFAULT_FACTOR,
        }
    }

    /// Resolve a material name to its factor.
    ///
    /// The query and each known material name are compared lowercased; a
    /// category matches when either contains the other, so "Algodão
    /// orgânico" still resolves to cotton. Unmatched names fall back to
    /// the default factor.
    pub fn resolve(&self, material: &str) -> &MaterialFactor {
        let query = material.trim().to_lowercase();
        if query.is_empty() {
            return &self.default_factor;
        }
        for category in &self.categories {
            for known in category.materials {
                let known = known.trim();
                if query.contains(known) || known.contains(query.as_str()) {
                    tracing::debug!(material, category = category.name, "material resolved");
                    return &category.factor;
                }
            }
        }
        tracing::warn!(material, "material not in table, using default factor");
        &self.default_factor
    }

    /// The always-present fallback factor.
    pub fn default_factor(&self) -> &MaterialFactor {
        &self.default_factor
    }

    /// Category name a material resolves to, for diagnostics.
    pub fn category_of(&self, material: &str) -> Option<&'static str> {
        let query = material.trim().to_lowercase();
        for category in &self.categories {
            for known in category.materials {
                let known = known.trim();
                if query.contains(known) || known.contains(query.as_str()) {
                    return Some(category.name);
                }
            }
        }
        None
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Enriched per-(type, material, country) factor overrides.
///
/// Consulted before the material table: an exact type+material+country hit
/// wins over the generic material factor. Empty when no enrichment data
/// has been loaded.
#[derive(Clone, Debug, Default)]
pub struct ReferenceDataset {
    entries: HashMap<(String, String, String), MaterialFactor>,
}

impl ReferenceDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an override. Keys are normalized lowercased.
    pub fn with_entry(
        mut self,
        item_type: &str,
        material: &str,
        origin_country: &str,
        factor: MaterialFactor,
    ) -> Self {
        self.entries.insert(normalize_key(item_type, material, origin_country), factor);
        self
    }

    pub fn lookup(
        &self,
        item_type: &str,
        material: &str,
        origin_country: &str,
    ) -> Option<&MaterialFactor> {
        self.entries.get(&normalize_key(item_type, material, origin_country))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(item_type: &str, material: &str, origin_country: &str) -> (String, String, String) {
    (
        item_type.trim().to_lowercase(),
        material.trim().to_lowercase(),
        origin_country.trim().to_lowercase(),
    )
}
