//! Credential provider trait.

/// Result of checking one username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The credentials are valid.
    Granted,
    /// The user exists and the password is wrong.
    Denied,
    /// This provider does not know the user; the next one may.
    UserNotFound,
    /// The provider could not decide.
    Error(String),
}

/// Trait for password-checking backends.
///
/// Implementations are registered by name at startup and shared between
/// requests, so they must not hold per-request state.
pub trait CredentialChecker: Send + Sync {
    /// Checks `password` for `username`.
    fn check_credentials(&self, username: &str, password: &str) -> Decision;

    /// Returns the implementation kind, such as `"password-file"`.
    ///
    /// Several registered names can share one kind; logs carry both.
    fn kind(&self) -> &'static str;
}
