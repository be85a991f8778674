//! Secret key for signing browser-held state (flash cookies)
//!
//! The key is either supplied externally (`FYYUR_SECRET_KEY`) or generated
//! once per process. A generated key does not survive a restart, so cookies
//! signed before a restart stop verifying afterwards and are ignored.

use hmac::digest::Key;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Process-wide signing key, held as a keyed HMAC-SHA256 state
#[derive(Clone)]
pub struct SecretKey {
    mac: HmacSha256,
}

impl SecretKey {
    /// Generate a random key (one full SHA-256 block)
    pub fn generate() -> Self {
        let mut key = Key::<HmacSha256>::default();
        rand::thread_rng().fill_bytes(&mut key);
        Self {
            mac: HmacSha256::new(&key),
        }
    }

    /// Use an externally supplied key
    ///
    /// Returns `None` for an empty or whitespace-only value.
    pub fn from_configured(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let mac = HmacSha256::new_from_slice(value.as_bytes()).ok()?;
        Some(Self { mac })
    }

    /// Sign a payload
    ///
    /// HMAC-SHA256 of the payload, as 64 hex characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use fyyur_common::SecretKey;
    ///
    /// let key = SecretKey::from_configured("s3cret").unwrap();
    /// let sig = key.sign("hello");
    /// assert_eq!(sig.len(), 64);
    /// assert!(key.verify("hello", &sig));
    /// assert!(!key.verify("hellO", &sig));
    /// ```
    pub fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }

    /// Check a signature produced by [`SecretKey::sign`]
    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        let expected = self.sign(payload);
        // Constant-time over equal-length hex strings
        expected.len() == signature.len()
            && expected
                .bytes()
                .zip(signature.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").field("key", &"<redacted>").finish()
    }
}
