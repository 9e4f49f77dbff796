//! Identifier types for contributions.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of random hex characters appended to a tracking ID.
const RANDOM_SUFFIX_LEN: usize = 12;

/// Unique external identifier for a contribution.
///
/// Assigned once at submission and immutable afterwards. The value embeds
/// the creation timestamp (UTC, second resolution) followed by a random
/// suffix, e.g. `REF-20260806143000-a1b2c3d4e5f6`, so IDs sort roughly by
/// creation time while staying non-enumerable. Stores reject duplicate
/// inserts, so the ID is safe to use as the primary lookup key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingId(pub String);

impl TrackingId {
    /// Generate a fresh tracking ID.
    pub fn generate() -> Self {
        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(RANDOM_SUFFIX_LEN)
            .collect();
        Self(format!("REF-{stamp}-{suffix}"))
    }

    /// Rehydrate a tracking ID from a stored value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines.
    pub fn short(&self) -> String {
        self.0.chars().take(18).collect()
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_carry_prefix_and_suffix() {
        let id = TrackingId::generate();
        assert!(id.as_str().starts_with("REF-"));
        let suffix = id.as_str().rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), RANDOM_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tight_loop_ids_are_pairwise_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(TrackingId::generate()));
        }
    }

    #[test]
    fn rehydrated_id_round_trips() {
        let id = TrackingId::new("REF-20260101000000-deadbeef0123");
        assert_eq!(id.to_string(), "REF-20260101000000-deadbeef0123");
    }
}
