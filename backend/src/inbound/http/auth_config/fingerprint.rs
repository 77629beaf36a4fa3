//! Signing secret fingerprinting for operational visibility.
//!
//! Operators compare the logged fingerprint across replicas to confirm they
//! share one secret without the secret itself reaching the logs.

use sha2::{Digest, Sha256};

use super::SigningSecret;

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the secret's SHA-256 digest as lowercase hex.
///
/// ```rust
/// use referrals::inbound::http::auth_config::SigningSecret;
/// use referrals::inbound::http::auth_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SigningSecret::ephemeral());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SigningSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
