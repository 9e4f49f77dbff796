//! Refio data model - contributions, items, impact metrics, and certificates.
//!
//! This crate holds the shared types for the contribution lifecycle: the
//! aggregate root [`Contribution`], its items and material composition,
//! the derived [`ImpactSummary`], and the hash-bound [`Certificate`].
//! All lifecycle and classification labels live in closed enums here so
//! every caller consumes the same state vocabulary.

#![deny(unsafe_code)]

pub mod certificate;
pub mod contribution;
pub mod ids;
pub mod impact;
pub mod item;
pub mod state;

pub use certificate::Certificate;
pub use contribution::{Contribution, LifecycleTimestamps};
pub use ids::TrackingId;
pub use impact::ImpactSummary;
pub use item::{ContributionItem, ItemComposition, MixtureComponent, ValidationError};
pub use state::{Classification, ContributionState, Destination};
