//! Password hashing and verification.
//!
//! Wraps bcrypt with a per-call salt embedded in the output, so verification
//! is self-contained against the stored hash alone.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// Hashes a plaintext password for storage.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| ServiceError::internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as `false` instead of erroring, so a
/// corrupt record can never alter an authentication decision.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    verify(password, stored_hash).unwrap_or(false)
}
