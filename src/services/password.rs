use crate::error::{AppError, AppResult};

/// Hash a plaintext password with bcrypt at the default cost.
pub fn hash_password(plain: &str) -> AppResult<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Check a candidate against a stored hash. Mismatches and malformed
/// stored hashes both report false rather than erroring.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
