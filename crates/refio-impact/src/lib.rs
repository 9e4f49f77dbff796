//! Refio impact subsystem - material factors and the impact calculator.
//!
//! Turns a description of donated/sold textile items into deterministic
//! environmental-impact metrics (CO₂, water, resource savings). The
//! [`MaterialTable`] is read-only after initialization and shared by all
//! calculator invocations; [`ImpactCalculator`] is the single
//! implementation every call site consumes.

#![deny(unsafe_code)]

pub mod calculator;
pub mod table;

pub use calculator::ImpactCalculator;
pub use table::{MaterialCategory, MaterialFactor, MaterialTable, ReferenceDataset};
