//! Password hashing for stored credentials.

use std::io;

/// Hash a plaintext password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Verify a plaintext password against a stored bcrypt hash. A malformed
/// hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Password verification failed against stored hash: {}", e);
            false
        }
    }
}

/// [`hash_password`] on the blocking thread pool, keeping bcrypt off the
/// async workers.
pub async fn hash_password_async(password: String, cost: u32) -> Result<String, bcrypt::BcryptError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .unwrap_or_else(|e| Err(io::Error::new(io::ErrorKind::Other, e).into()))
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_async(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}
