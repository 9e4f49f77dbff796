//! Canonical serialization of certificate content.
//!
//! The hash input must be byte-identical for the same logical content:
//! fixed field order, fixed number formatting, no whitespace variance.
//! Changing this format invalidates every previously issued certificate,
//! so it is versioned with a leading schema tag.

use refio_types::Certificate;

/// Schema tag prefixed to every canonical string.
pub const CANONICAL_VERSION: &str = "refio-cert-v1";

/// Decimal places used when rendering impact numbers.
const NUMBER_PRECISION: usize = 6;

/// Build the canonical content string for a certificate.
///
/// Covers every visible field except `content_hash` itself, in fixed
/// order, `|`-separated. Timestamps are RFC 3339; numbers carry exactly
/// six decimal places.
pub fn canonical_content(certificate: &Certificate) -> String {
    format!(
        "{version}|{tracking_id}|{subject}|{classification}|{destination}|{co2:.prec$}|{water:.prec$}|{resources:.prec$}|{issued_at}|{issuer}",
        version = CANONICAL_VERSION,
        tracking_id = certificate.tracking_id,
        subject = certificate.subject_name,
        classification = certificate.classification,
        destination = certificate.destination,
        co2 = certificate.impact.co2_saved_kg,
        water = certificate.impact.water_saved_l,
        resources = certificate.impact.resource_saving_percent,
        issued_at = certificate.issued_at.to_rfc3339(),
        issuer = certificate.issuer,
        prec = NUMBER_PRECISION,
    )
}
