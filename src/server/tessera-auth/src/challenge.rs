//! `WWW-Authenticate` challenges.

use std::fmt;

/// Error code carried by a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeError {
    /// The request itself is unusable (wrong scheme).
    InvalidRequest,
    /// The presented token was refused.
    InvalidToken,
}

impl ChallengeError {
    /// Code as written in the header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidToken => "invalid_token",
        }
    }
}

/// A Bearer challenge for one realm.
///
/// Renders as `Bearer realm="<realm>"`, followed by
/// `, error="<code>", error_description="<text>"` when an error is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    realm: String,
    error: Option<(ChallengeError, &'static str)>,
}

impl Challenge {
    /// A bare challenge asking for credentials.
    pub fn new(realm: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            error: None,
        }
    }

    /// Attaches an error code and description.
    pub fn with_error(mut self, code: ChallengeError, description: &'static str) -> Self {
        self.error = Some((code, description));
        self
    }

    /// The realm.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// The error code, if any.
    pub fn error(&self) -> Option<ChallengeError> {
        self.error.map(|(code, _)| code)
    }

    /// The error description, if any.
    pub fn description(&self) -> Option<&'static str> {
        self.error.map(|(_, description)| description)
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer realm=\"{}\"", self.realm)?;
        if let Some((code, description)) = self.error {
            write!(
                f,
                ", error=\"{}\", error_description=\"{}\"",
                code.as_str(),
                description
            )?;
        }
        Ok(())
    }
}
