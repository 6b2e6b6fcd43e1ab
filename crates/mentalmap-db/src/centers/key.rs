//! Deduplication key for center records.

/// Compute a stable dedup key for a center.
///
/// SHA-256 over `name || address`, both trimmed and lower-cased, NUL-joined.
/// Hex-encoded. Crawler exports carry no stable external id, so this is the
/// conflict target for re-imports.
#[must_use]
pub fn make_center_key(name: &str, address: Option<&str>) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}",
        name.trim().to_lowercase(),
        address.unwrap_or("").trim().to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
