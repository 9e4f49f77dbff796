//! Refio certificate subsystem - issuance and tamper verification.
//!
//! A certificate is a hash-bound snapshot of a contribution's final impact
//! and classification. The hash is a SHA-256 digest over a canonical
//! serialization of the visible fields, giving a cheap,
//! infrastructure-independent tamper check that any party holding the
//! certificate can re-run. This is deliberately not a ledger: the digest
//! could be anchored externally later, but issuance and verification are
//! local, pure computations.

#![deny(unsafe_code)]

pub mod canonical;

use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;

use refio_types::{Certificate, Contribution, ContributionState};

pub use canonical::{canonical_content, CANONICAL_VERSION};

/// Errors raised at issuance time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// Generation is only allowed for contributions in `verified`.
    #[error("contribution is {0}, certificate generation requires verified")]
    NotVerified(ContributionState),

    /// A verified contribution must carry classification and destination.
    #[error("contribution is missing {0}")]
    MissingField(&'static str),
}

/// Result of re-checking a certificate against its own content hash.
///
/// A mismatch means the visible fields were altered after issuance, or
/// the hashing procedure drifted; either way it is surfaced, never
/// silently ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Valid,
    HashMismatch { computed: String, stored: String },
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Which comparison failed, if any. With a single content hash the
    /// failing comparison is the digest itself.
    pub fn failed_comparison(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::HashMismatch { .. } => Some("content_hash"),
        }
    }
}

/// Issue a certificate for a verified contribution.
///
/// Captures the generation time, freezes the contribution's impact
/// figures into the canonical content, and binds everything with a
/// SHA-256 content hash. The caller (the lifecycle engine) persists the
/// result exactly once.
pub fn generate(
    contribution: &Contribution,
    issuer: impl Into<String>,
) -> Result<Certificate, CertificateError> {
    if contribution.state != ContributionState::Verified {
        return Err(CertificateError::NotVerified(contribution.state));
    }
    let classification = contribution
        .classification
        .ok_or(CertificateError::MissingField("classification"))?;
    let destination = contribution
        .destination
        .ok_or(CertificateError::MissingField("destination"))?;

    let mut certificate = Certificate {
        tracking_id: contribution.tracking_id.clone(),
        subject_name: contribution.subject_name.clone(),
        classification,
        destination,
        impact: contribution.impact,
        issued_at: Utc::now(),
        issuer: issuer.into(),
        content_hash: String::new(),
    };
    certificate.content_hash = hash_content(&canonical_content(&certificate));

    tracing::info!(
        tracking_id = %certificate.tracking_id,
        content_hash = %certificate.content_hash,
        "certificate issued"
    );
    Ok(certificate)
}

/// Re-derive the content hash from a certificate's visible fields and
/// compare it to the stored one.
pub fn verify(certificate: &Certificate) -> VerificationOutcome {
    let computed = hash_content(&canonical_content(certificate));
    if computed == certificate.content_hash {
        VerificationOutcome::Valid
    } else {
        VerificationOutcome::HashMismatch {
            computed,
            stored: certificate.content_hash.clone(),
        }
    }
}

fn hash_content(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
