//! Engine configuration.

/// Configuration for the contribution engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Identity stamped into issued certificates as the issuer.
    pub issuer_identity: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            issuer_identity: "refio-certification".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_issuer(issuer_identity: impl Into<String>) -> Self {
        Self {
            issuer_identity: issuer_identity.into(),
        }
    }
}
