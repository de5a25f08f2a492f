use sha2::{Digest, Sha256};

/// Placeholder used when a user agent or client IP could not be extracted.
/// One fixed sentinel everywhere — a missing value widens the identity
/// space but never fails derivation.
pub const UNKNOWN: &str = "unknown";

/// Derive the anonymous session key for a visitor.
///
/// Formula: sha256(visitor_token || user_agent) encoded as 64 hex chars.
///
/// Deterministic and one-way: the same (token, UA) pair always collapses to
/// the same key, and the key cannot be reversed to recover the token. A
/// different user agent from the same visitor token yields a different key —
/// the key is an identity proxy, not a perfect identity.
pub fn derive_session_key(visitor_token: &str, user_agent: &str) -> String {
    let ua = if user_agent.is_empty() {
        UNKNOWN
    } else {
        user_agent
    };
    let input = format!("{}{}", visitor_token, ua);
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// One-way hash of a client IP, for storage only — never matched against.
///
/// Missing or unextractable IPs must be passed as [`UNKNOWN`] by the caller
/// so the stored hash is consistent across requests.
pub fn hash_ip(ip: &str) -> String {
    let ip = if ip.is_empty() { UNKNOWN } else { ip };
    hex::encode(Sha256::digest(ip.as_bytes()))
}
