//! crates/deepchat_core/src/password.rs
//!
//! Write-only password handling. A plaintext password goes in through
//! [`PasswordHash::new`] and can only ever be checked again via
//! [`PasswordHash::verify`]; no accessor returns the plaintext, so the
//! write-only contract is enforced at compile time.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// A salted, one-way password hash.
///
/// `Debug` prints the hash string, never a plaintext; the plaintext is
/// consumed by [`new`](Self::new) and dropped.
#[derive(Debug, Clone)]
pub struct PasswordHash(String);

/// Failure to derive a hash from a plaintext password.
#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct HashError(String);

impl PasswordHash {
    /// Hashes a plaintext password with a fresh random salt.
    pub fn new(plaintext: &str) -> Result<Self, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wraps a hash string read back from storage.
    ///
    /// The storage adapter is the only intended caller; nothing validates
    /// the string here, a malformed hash simply fails every `verify`.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Checks a plaintext password against this hash.
    ///
    /// Comparison happens inside argon2's verifier, which is constant-time
    /// over the derived key. Malformed stored hashes verify as false.
    pub fn verify(&self, plaintext: &str) -> bool {
        let Ok(parsed) = argon2::PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// The encoded hash string, for persistence only.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
