//! Lifecycle states and operator classification.
//!
//! The transition order `Registered → Received → Verified → Certified` is
//! strictly linear: no branching, no skip-ahead, no cycles. These enums
//! are the single source of truth for status and classification labels;
//! callers must not keep their own string variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionState {
    Registered,
    Received,
    Verified,
    Certified,
}

impl ContributionState {
    /// The single allowed successor state, if any.
    pub fn next(&self) -> Option<ContributionState> {
        match self {
            Self::Registered => Some(Self::Received),
            Self::Received => Some(Self::Verified),
            Self::Verified => Some(Self::Certified),
            Self::Certified => None,
        }
    }

    /// Whether a direct transition to `target` is allowed.
    pub fn can_advance_to(&self, target: ContributionState) -> bool {
        self.next() == Some(target)
    }

    /// Certified contributions accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Certified)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Received => "received",
            Self::Verified => "verified",
            Self::Certified => "certified",
        }
    }
}

impl fmt::Display for ContributionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification assigned by an operator during physical verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Reusable,
    Repairable,
    Recyclable,
}

impl Classification {
    /// Fixed mapping from classification to downstream destination.
    pub fn destination(&self) -> Destination {
        match self {
            Self::Reusable => Destination::MarketplaceOrDonation,
            Self::Repairable => Destination::LocalArtisans,
            Self::Recyclable => Destination::RecyclingCenters,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reusable => "reusable",
            Self::Repairable => "repairable",
            Self::Recyclable => "recyclable",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a classified contribution is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    MarketplaceOrDonation,
    LocalArtisans,
    RecyclingCenters,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketplaceOrDonation => "marketplace_or_donation",
            Self::LocalArtisans => "local_artisans",
            Self::RecyclingCenters => "recycling_centers",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_order_is_strictly_linear() {
        assert_eq!(
            ContributionState::Registered.next(),
            Some(ContributionState::Received)
        );
        assert_eq!(
            ContributionState::Received.next(),
            Some(ContributionState::Verified)
        );
        assert_eq!(
            ContributionState::Verified.next(),
            Some(ContributionState::Certified)
        );
        assert_eq!(ContributionState::Certified.next(), None);
    }

    #[test]
    fn skip_ahead_is_not_allowed() {
        assert!(!ContributionState::Registered.can_advance_to(ContributionState::Verified));
        assert!(!ContributionState::Registered.can_advance_to(ContributionState::Certified));
        assert!(!ContributionState::Received.can_advance_to(ContributionState::Certified));
    }

    #[test]
    fn no_transition_leaves_certified() {
        let terminal = ContributionState::Certified;
        assert!(terminal.is_terminal());
        for target in [
            ContributionState::Registered,
            ContributionState::Received,
            ContributionState::Verified,
            ContributionState::Certified,
        ] {
            assert!(!terminal.can_advance_to(target));
        }
    }

    #[test]
    fn classification_maps_to_fixed_destination() {
        assert_eq!(
            Classification::Reusable.destination(),
            Destination::MarketplaceOrDonation
        );
        assert_eq!(
            Classification::Repairable.destination(),
            Destination::LocalArtisans
        );
        assert_eq!(
            Classification::Recyclable.destination(),
            Destination::RecyclingCenters
        );
    }

    #[test]
    fn labels_serialize_snake_case() {
        let json = serde_json::to_string(&ContributionState::Registered).unwrap();
        assert_eq!(json, "\"registered\"");
        let json = serde_json::to_string(&Destination::MarketplaceOrDonation).unwrap();
        assert_eq!(json, "\"marketplace_or_donation\"");
    }
}
