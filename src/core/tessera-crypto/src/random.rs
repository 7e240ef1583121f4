//! Cryptographically secure random generation.
//!
//! Uses the operating system's CSPRNG for all random number generation.

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use zeroize::Zeroizing;

use crate::keys::SignatureAlgorithm;

/// Generates a random alphanumeric secret of exactly `len` bytes.
///
/// The output is printable so it can be pasted into a configuration file.
/// It is wrapped in `Zeroizing` to ensure it is cleared from memory when dropped.
pub fn generate_secret(len: usize) -> Zeroizing<String> {
    let secret: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect();
    Zeroizing::new(secret)
}

/// Generates a secret with the length `algorithm` requires.
pub fn generate_secret_for(algorithm: SignatureAlgorithm) -> Zeroizing<String> {
    generate_secret(algorithm.required_key_len())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_secret_length() {
        for len in [0, 1, 32, 64] {
            assert_eq!(generate_secret(len).len(), len);
        }
    }

    #[test]
    fn test_generate_secret_is_alphanumeric() {
        let secret = generate_secret(64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_secret_passes_key_check() {
        for alg in SignatureAlgorithm::ALL {
            let secret = generate_secret_for(alg);
            assert!(alg.check_key(secret.as_bytes()).is_ok());
        }
    }

    #[test]
    fn test_randomness_distribution() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let secret = generate_secret(16);
            assert!(seen.insert(secret.to_string()), "duplicate secret generated");
        }
    }
}
