//! Password hashing for stored credentials.
//!
//! This module provides:
//! - Argon2id password hashes encoded as PHC strings (salt and parameters embedded)
//! - Verification of legacy unsalted SHA-256 hex digests written by earlier deployments
//!
//! # Security
//!
//! - Uses Argon2id (memory-hard, resistant to GPU/ASIC attacks)
//! - Random salt per stored hash
//! - Legacy digests are compared in constant time

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a hex-encoded SHA-256 digest.
const LEGACY_DIGEST_LEN: usize = 64;

/// Errors during password hashing.
#[derive(Debug, Error)]
pub enum KdfError {
    #[error("Invalid Argon2 parameters: {0}")]
    Params(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Invalid salt: {0}")]
    Salt(String),
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 47104,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Create custom cost parameters.
    #[must_use]
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, KdfError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, Some(32))
            .map_err(|e| KdfError::Params(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Generate a random salt for Argon2id.
#[must_use]
pub fn generate_salt() -> SaltString {
    SaltString::generate(&mut OsRng)
}

/// Parse a salt from its B64 encoding.
///
/// # Errors
/// Returns `KdfError::Salt` if the encoding is invalid.
pub fn salt_from_b64(b64: &str) -> Result<SaltString, KdfError> {
    SaltString::from_b64(b64).map_err(|e| KdfError::Salt(e.to_string()))
}

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns error if hashing fails.
pub fn hash_password(password: &str, params: &KdfParams) -> Result<String, KdfError> {
    hash_password_with_salt(password, &generate_salt(), params)
}

/// Hash a password with the given salt.
///
/// Deterministic: the same password, salt and parameters always produce the
/// same PHC string.
///
/// # Errors
/// Returns error if hashing fails.
pub fn hash_password_with_salt(
    password: &str,
    salt: &SaltString,
    params: &KdfParams,
) -> Result<String, KdfError> {
    let argon2 = params.argon2()?;
    let hash = argon2
        .hash_password(password.as_bytes(), salt)
        .map_err(|e| KdfError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Accepts Argon2 PHC strings and legacy 64-character SHA-256 hex digests.
/// Malformed stored values never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        let candidate = legacy_digest(password);
        return constant_time_eq_str(&candidate, &stored.to_ascii_lowercase());
    }

    match PasswordHash::new(stored) {
        // Cost parameters are read from the PHC string itself.
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Unsalted SHA-256 hex digest used by earlier deployments.
#[must_use]
pub fn legacy_digest(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == LEGACY_DIGEST_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

// Constant-time compare for ASCII strings.
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams::new(1024, 1, 1)
    }

    #[test]
    fn test_hash_is_deterministic_for_fixed_salt() {
        let salt = salt_from_b64("c29tZXNhbHRzb21lc2FsdA").expect("Valid salt");
        let first = hash_password_with_salt("secret123", &salt, &fast_params())
            .expect("Hashing should succeed");
        let second = hash_password_with_salt("secret123", &salt, &fast_params())
            .expect("Hashing should succeed");

        assert_eq!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_different_passwords_hash_differently() {
        let salt = salt_from_b64("c29tZXNhbHRzb21lc2FsdA").expect("Valid salt");
        let a = hash_password_with_salt("secret123", &salt, &fast_params()).expect("hash");
        let b = hash_password_with_salt("secret124", &salt, &fast_params()).expect("hash");

        assert_ne!(a, b);
    }

    #[test]
    fn test_fresh_salts_differ_but_both_verify() {
        let a = hash_password("secret123", &fast_params()).expect("hash");
        let b = hash_password("secret123", &fast_params()).expect("hash");

        assert_ne!(a, b);
        assert!(verify_password("secret123", &a));
        assert!(verify_password("secret123", &b));
        assert!(!verify_password("wrong", &a));
    }

    #[test]
    fn test_legacy_digest_verifies() {
        let stored = legacy_digest("secret123");
        assert_eq!(stored.len(), 64);
        assert_eq!(stored, legacy_digest("secret123"));

        assert!(verify_password("secret123", &stored));
        assert!(verify_password("secret123", &stored.to_uppercase()));
        assert!(!verify_password("secret12", &stored));
    }

    #[test]
    fn test_known_legacy_digest() {
        assert_eq!(
            legacy_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_malformed_stored_hash_never_verifies() {
        assert!(!verify_password("", ""));
        assert!(!verify_password("secret", "not-a-hash"));
        assert!(!verify_password("secret", "$argon2id$broken"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = hash_password("x", &KdfParams::new(1, 0, 0));
        assert!(matches!(result, Err(KdfError::Params(_))));
    }
}
