//! Cryptographic error types.

use thiserror::Error;

use crate::keys::SignatureAlgorithm;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The algorithm name is not one of the supported HMAC algorithms.
    #[error(
        "unsupported signature algorithm '{0}': the only supported algorithms are \
         HS256 (HMAC SHA256), HS384 (HMAC SHA384), and HS512 (HMAC SHA512)"
    )]
    UnsupportedAlgorithm(String),

    /// The signing secret does not have the length the algorithm requires.
    #[error("the secret length must be {expected} with {algorithm} (current length is {actual})")]
    InvalidKeyLength {
        /// Algorithm the secret was checked against.
        algorithm: SignatureAlgorithm,
        /// Required length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// A stored password hash could not be parsed.
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}
