//! Shared-secret verification for the deploy webhook.
//!
//! The configured token is never compared byte-by-byte with user input.
//! Both sides are MACed with HMAC-SHA256 under a random per-process key and
//! the tags are checked with [`Mac::verify_slice`], which is constant-time.
//! Hashing first also hides the secret's length from timing.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Token shipped in `.env.example`. Only acceptable in development.
pub const PLACEHOLDER_TOKEN: &str = "change-me-deploy-token";

/// The deploy webhook's shared secret.
///
/// Holds only a MAC of the secret, not the secret itself.
pub struct SharedSecret {
    key: [u8; 32],
    expected_tag: Vec<u8>,
}

impl SharedSecret {
    /// Rejects empty or whitespace-only secrets.
    pub fn new(secret: &str) -> Result<Self, CoreError> {
        if secret.trim().is_empty() {
            return Err(CoreError::Validation(
                "Deploy token must not be empty".into(),
            ));
        }

        let mut key = [0u8; 32];
        rand::rng().fill(&mut key);
        let expected_tag = mac(&key, secret).finalize().into_bytes().to_vec();

        Ok(Self { key, expected_tag })
    }

    /// Constant-time check of a candidate token.
    pub fn verify(&self, candidate: &str) -> bool {
        mac(&self.key, candidate)
            .verify_slice(&self.expected_tag)
            .is_ok()
    }
}

fn mac(key: &[u8], value: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(value.as_bytes());
    mac
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([redacted])")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
