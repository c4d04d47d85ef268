//! Password hashing.
//!
//! Thin wrapper over bcrypt so the rest of the identity layer never touches
//! the primitive directly.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage.
pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    hash(plaintext, DEFAULT_COST)
}

/// Whether `plaintext` matches the stored hash. Any verification failure
/// (including an unparsable hash) reads as a mismatch.
pub fn verify_password(plaintext: &str, password_hash: &str) -> bool {
    verify(plaintext, password_hash).unwrap_or(false)
}
