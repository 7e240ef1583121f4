//! Argon2id password hashing.
//!
//! Stored hashes use the PHC string format
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::CryptoError;

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::HashingFailed(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash.
///
/// Returns `Ok(false)` on a password mismatch.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidHash`] if the stored hash cannot be parsed
/// or verification fails for a reason other than a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CryptoError> {
    let parsed = PasswordHash::new(hash).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CryptoError::InvalidHash(e.to_string())),
    }
}
