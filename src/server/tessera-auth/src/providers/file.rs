//! Password file provider.
//!
//! Reads `user:hash` lines once at startup. Hashes are Argon2 PHC strings as
//! printed by `tessera hash-password`. Blank lines and lines starting with
//! `#` are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use super::check_hash;
use crate::error::AuthError;
use crate::provider::{CredentialChecker, Decision};

/// Authentication backend for password files.
#[derive(Debug, Clone)]
pub struct PasswordFileProvider {
    path: PathBuf,
    users: HashMap<String, String>,
}

impl PasswordFileProvider {
    /// Loads and parses the password file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the file cannot be read or a
    /// line is not of the form `user:hash`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let provider = Self::parse(path, &text)?;
        info!(
            path = %path.display(),
            users = provider.users.len(),
            "Password file loaded"
        );
        Ok(provider)
    }

    /// Parses password file contents; `path` is only used in messages.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, AuthError> {
        let path = path.into();
        let mut users = HashMap::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(':') {
                Some((user, hash)) if !user.is_empty() && !hash.is_empty() => {
                    users.insert(user.to_string(), hash.to_string());
                },
                _ => {
                    return Err(AuthError::Configuration(format!(
                        "{}:{}: expected 'user:hash'",
                        path.display(),
                        index + 1
                    )));
                },
            }
        }

        Ok(Self { path, users })
    }

    /// Path the provider was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of users in the file.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if the file declares no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialChecker for PasswordFileProvider {
    fn check_credentials(&self, username: &str, password: &str) -> Decision {
        match self.users.get(username) {
            Some(hash) => check_hash(username, password, hash),
            None => Decision::UserNotFound,
        }
    }

    fn kind(&self) -> &'static str {
        "password-file"
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::io::Write;
    use tessera_crypto::password::hash_password;

    #[test]
    fn test_load_and_check() {
        let hash = hash_password("hunter2").unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# operators").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "alice:{}", hash).unwrap();

        let provider = PasswordFileProvider::load(file.path()).unwrap();
        assert_eq!(provider.len(), 1);
        assert_eq!(
            provider.check_credentials("alice", "hunter2"),
            Decision::Granted
        );
        assert_eq!(
            provider.check_credentials("alice", "hunter3"),
            Decision::Denied
        );
        assert_eq!(
            provider.check_credentials("mallory", "hunter2"),
            Decision::UserNotFound
        );
    }

    #[test]
    fn test_unparseable_hash_is_error() {
        let provider = PasswordFileProvider::parse("users", "bob:plaintext\n").unwrap();
        assert!(matches!(
            provider.check_credentials("bob", "plaintext"),
            Decision::Error(_)
        ));
    }

    #[test]
    fn test_line_without_separator_rejected() {
        let result = PasswordFileProvider::parse("users", "alice\n");
        match result {
            Err(AuthError::Configuration(message)) => assert!(message.contains("users:1")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = PasswordFileProvider::load("/nonexistent/users.passwd");
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }
}
