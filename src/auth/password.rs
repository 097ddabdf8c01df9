//! Salted password hashing
//!
//! Stored credentials have the form `salt:digest`, where `salt` is a
//! hex-encoded random value and `digest` is the hex HMAC-SHA256 of the
//! password keyed with that salt string.

use rand::RngCore;
use ring::hmac;

use crate::constants::SALT_LEN;

/// Hashes and verifies account passwords
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> String {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);
        let digest = hmac::sign(&salt_key(&salt), password.as_bytes());
        format!("{}:{}", salt, hex::encode(digest.as_ref()))
    }

    /// Verify a candidate password against a stored `salt:digest` string.
    ///
    /// Malformed stored values verify as `false`.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let mut parts = stored.split(':');
        let (salt, digest_hex) = match (parts.next(), parts.next(), parts.next()) {
            (Some(salt), Some(digest), None) if !salt.is_empty() => (salt, digest),
            _ => return false,
        };

        let expected = match hex::decode(digest_hex) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        // ring compares the tag in constant time
        hmac::verify(&salt_key(salt), password.as_bytes(), &expected).is_ok()
    }
}

fn salt_key(salt: &str) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, salt.as_bytes())
}
