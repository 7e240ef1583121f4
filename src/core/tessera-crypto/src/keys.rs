//! Signature algorithms and signing secrets.
//!
//! Signing secrets implement `Zeroize` and `ZeroizeOnDrop` so the key
//! material is erased from memory when the owning configuration is dropped.

use std::str::FromStr;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Required secret length for HS256, in bytes.
pub const HS256_KEY_SIZE: usize = 32;

/// Required secret length for HS384, in bytes.
///
/// Deployed configurations pair HS384 with 32-byte secrets, so this is 32
/// and not the 48 bytes an HMAC-SHA384 key would normally use.
pub const HS384_KEY_SIZE: usize = 32;

/// Required secret length for HS512, in bytes.
pub const HS512_KEY_SIZE: usize = 64;

/// Supported HMAC signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// HMAC with SHA-256.
    Hs256,
    /// HMAC with SHA-384 (see [`SignatureAlgorithm::signing_primitive`]).
    Hs384,
    /// HMAC with SHA-512.
    Hs512,
}

impl SignatureAlgorithm {
    /// All supported algorithms.
    pub const ALL: [SignatureAlgorithm; 3] = [Self::Hs256, Self::Hs384, Self::Hs512];

    /// Returns the exact secret length, in bytes, this algorithm requires.
    pub fn required_key_len(self) -> usize {
        match self {
            Self::Hs256 => HS256_KEY_SIZE,
            Self::Hs384 => HS384_KEY_SIZE,
            Self::Hs512 => HS512_KEY_SIZE,
        }
    }

    /// Returns the algorithm actually used to sign and verify tokens.
    ///
    /// HS384 is signed with HMAC-SHA256. Tokens already issued under an
    /// HS384 configuration carry `"alg":"HS256"` and must keep verifying.
    pub fn signing_primitive(self) -> SignatureAlgorithm {
        match self {
            Self::Hs384 => Self::Hs256,
            other => other,
        }
    }

    /// Checks that `secret` has exactly the length this algorithm requires.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] on any mismatch. Secrets are
    /// never truncated or padded.
    pub fn check_key(self, secret: &[u8]) -> Result<(), CryptoError> {
        let expected = self.required_key_len();
        if secret.len() != expected {
            return Err(CryptoError::InvalidKeyLength {
                algorithm: self,
                expected,
                actual: secret.len(),
            });
        }
        Ok(())
    }

    /// Returns the JOSE name of the algorithm.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// A shared HMAC signing secret with automatic zeroization.
///
/// The secret is an opaque byte string. Its length is only validated against
/// an algorithm at the point of use.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Creates a signing secret from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the raw secret bytes.
    ///
    /// Use with caution - callers must not keep copies of the returned slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the secret length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for SigningSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("bytes", &"[REDACTED]")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!(
            "HS256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Hs256
        );
        assert_eq!(
            "HS384".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Hs384
        );
        assert_eq!(
            "HS512".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Hs512
        );
    }

    #[test]
    fn test_parse_rejects_unknown_algorithms() {
        for name in ["RS256", "none", "hs256", ""] {
            let result = name.parse::<SignatureAlgorithm>();
            assert!(matches!(result, Err(CryptoError::UnsupportedAlgorithm(_))));
        }
    }

    #[test]
    fn test_display_matches_jose_name() {
        for alg in SignatureAlgorithm::ALL {
            assert_eq!(alg.to_string().parse::<SignatureAlgorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn test_hs256_key_length_is_exact() {
        let alg = SignatureAlgorithm::Hs256;
        assert!(alg.check_key(&[0x41; 32]).is_ok());
        assert!(matches!(
            alg.check_key(&[0x41; 31]),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31,
                ..
            })
        ));
        assert!(matches!(
            alg.check_key(&[0x41; 33]),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 33,
                ..
            })
        ));
    }

    #[test]
    fn test_hs384_requires_32_byte_key() {
        let alg = SignatureAlgorithm::Hs384;
        assert!(alg.check_key(&[0x41; 32]).is_ok());
        assert!(alg.check_key(&[0x41; 48]).is_err());
    }

    #[test]
    fn test_hs384_signs_with_hs256() {
        assert_eq!(
            SignatureAlgorithm::Hs384.signing_primitive(),
            SignatureAlgorithm::Hs256
        );
        assert_eq!(
            SignatureAlgorithm::Hs512.signing_primitive(),
            SignatureAlgorithm::Hs512
        );
    }

    #[test]
    fn test_hs512_key_length_is_exact() {
        let alg = SignatureAlgorithm::Hs512;
        assert!(alg.check_key(&[0x41; 64]).is_ok());
        assert!(alg.check_key(&[0x41; 32]).is_err());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = SigningSecret::from("super-secret-value");
        let debug_str = format!("{:?}", secret);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret-value"));
    }

    #[test]
    fn test_secret_len() {
        let secret = SigningSecret::new(vec![7u8; 64]);
        assert_eq!(secret.len(), 64);
        assert!(!secret.is_empty());
        assert!(SigningSecret::new(Vec::new()).is_empty());
    }
}
