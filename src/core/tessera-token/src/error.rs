//! Token error types.

use thiserror::Error;

use tessera_crypto::CryptoError;

/// Reasons a presented token is refused.
///
/// These are client-facing: each maps to a description carried in the
/// authentication challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Decoding failed or the signature does not verify.
    #[error("decoding process has failed, token is malformed")]
    Malformed,

    /// The header declares the unsigned `none` algorithm.
    #[error("token declares the unsigned 'none' algorithm")]
    UnsignedAlgorithm,

    /// `iss` differs from the configured issuer.
    #[error("token issuer does not match with configured issuer")]
    IssuerMismatch,

    /// `aud` differs from the configured audience.
    #[error("token audience does not match with configured audience")]
    AudienceMismatch,

    /// `sub` differs from the configured subject.
    #[error("token subject does not match with configured subject")]
    SubjectMismatch,

    /// The mandatory `exp` claim is absent.
    #[error("missing exp in token")]
    MissingExpiry,

    /// `exp` is in the past, leeway included.
    #[error("token expired")]
    Expired,

    /// `nbf` is in the future, leeway included.
    #[error("nbf check failed, token can't be processed now")]
    NotYetValid,
}

impl ValidationError {
    /// Human-readable description surfaced in the `error_description`
    /// challenge parameter.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Malformed | Self::UnsignedAlgorithm => "Token is malformed",
            Self::IssuerMismatch => "Issuer is not valid",
            Self::AudienceMismatch => "Audience is not valid",
            Self::SubjectMismatch => "Subject is not valid",
            Self::MissingExpiry => "Expiration is missing in token",
            Self::Expired => "Token expired",
            Self::NotYetValid => "Token can't be processed now due to nbf field",
        }
    }
}

/// Errors returned by [`TokenCodec`](crate::TokenCodec).
#[derive(Debug, Error)]
pub enum TokenError {
    /// The algorithm/secret pair is unusable (configuration fault).
    #[error(transparent)]
    Key(#[from] CryptoError),

    /// Serializing or signing a token failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The presented token was refused.
    #[error("invalid token: {0}")]
    Invalid(#[from] ValidationError),
}

impl TokenError {
    /// Returns the validation failure, if this error is client-facing.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Invalid(reason) => Some(*reason),
            Self::Key(_) | Self::Signing(_) => None,
        }
    }
}
