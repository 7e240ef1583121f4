//! Authentication error types.

use thiserror::Error;

use tessera_token::{TokenError, ValidationError};

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The effective configuration cannot serve this request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Missing, unknown or wrong credentials on login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The presented token was refused.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] ValidationError),

    /// The token verified but carries no `user` claim.
    #[error("username was not in token")]
    MissingUsername,

    /// A provider failed for a reason other than the credentials.
    #[error("provider error: {0}")]
    Provider(String),

    /// No `Authorization` header was sent.
    #[error("missing authentication token")]
    MissingToken,

    /// The `Authorization` header does not use the `Bearer` scheme.
    #[error("authentication type must be Bearer")]
    InvalidScheme,

    /// A location names a provider that was never declared.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// How a failed request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 401.
    Unauthorized,
    /// 400.
    BadRequest,
    /// 500.
    InternalError,
}

impl AuthError {
    /// Returns how this error is answered to the client.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::InvalidCredentials
            | Self::InvalidToken(_)
            | Self::MissingUsername
            | Self::MissingToken => Outcome::Unauthorized,
            Self::InvalidScheme => Outcome::BadRequest,
            Self::Configuration(_) | Self::Provider(_) | Self::UnknownProvider(_) => {
                Outcome::InternalError
            },
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(reason) => Self::InvalidToken(reason),
            other => Self::Configuration(other.to_string()),
        }
    }
}
