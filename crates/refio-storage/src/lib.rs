//! Refio storage contract - persistence seam for contribution records.
//!
//! This crate defines the storage-agnostic field contract the engine
//! persists through, including the optimistic-concurrency transition
//! write that keeps state changes on one contribution serialized. The
//! in-memory adapter is the deterministic reference implementation.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryContributionStore;
pub use traits::{ContributionStore, QueryWindow};
