//! Observability for the token service.
//!
//! Logs never carry secrets, key material or issued tokens. Caller identities
//! appear only as a short correlation hash.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for the application identity so log lines for the same caller can be
/// grouped without storing the identity in plaintext.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    // First 8 hex chars (32 bits): enough for correlation, limits reversibility
    let prefix: Vec<u8> = result.iter().take(4).copied().collect();
    hex::encode(prefix)
}
