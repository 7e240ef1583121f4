//! In-memory credential provider.

use std::collections::HashMap;

use tessera_crypto::{password::hash_password, CryptoError};

use super::check_hash;
use crate::provider::{CredentialChecker, Decision};

/// A provider backed by a map of usernames to Argon2 PHC hashes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    users: HashMap<String, String>,
}

impl InMemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user with an already hashed password.
    pub fn with_hash(mut self, username: impl Into<String>, hash: impl Into<String>) -> Self {
        self.users.insert(username.into(), hash.into());
        self
    }

    /// Adds a user, hashing `password` with Argon2id.
    pub fn with_password(
        self,
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, CryptoError> {
        let hash = hash_password(password)?;
        Ok(self.with_hash(username, hash))
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no user is known.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialChecker for InMemoryProvider {
    fn check_credentials(&self, username: &str, password: &str) -> Decision {
        match self.users.get(username) {
            Some(hash) => check_hash(username, password, hash),
            None => Decision::UserNotFound,
        }
    }

    fn kind(&self) -> &'static str {
        "in-memory"
    }
}
