//! Per-scope configuration records.

use tessera_crypto::{SignatureAlgorithm, SigningSecret};

/// Token directives declared at one scope (server-wide or one location).
///
/// `None` means "not configured at this scope", which is distinct from a
/// configured zero. Empty strings are kept as written; the resolver treats
/// them as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeConfig {
    /// Algorithm used to sign and verify tokens.
    pub signature_algorithm: Option<SignatureAlgorithm>,
    /// Shared HMAC secret.
    pub signature_secret: Option<SigningSecret>,
    /// Issuer written to and expected in `iss`.
    pub issuer: Option<String>,
    /// Subject written to and expected in `sub`.
    pub subject: Option<String>,
    /// Audience written to and expected in `aud`.
    pub audience: Option<String>,
    /// Seconds until issued tokens expire.
    pub expiry_delay: Option<u32>,
    /// Seconds before issued tokens become valid.
    pub not_before_delay: Option<u32>,
    /// Clock skew tolerance in seconds.
    pub leeway: Option<u32>,
}

impl ScopeConfig {
    /// Sets the signature algorithm.
    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.signature_algorithm = Some(algorithm);
        self
    }

    /// Sets the signing secret.
    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.signature_secret = Some(SigningSecret::new(secret));
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the expiry delay.
    pub fn with_expiry_delay(mut self, seconds: u32) -> Self {
        self.expiry_delay = Some(seconds);
        self
    }

    /// Sets the not-before delay.
    pub fn with_not_before_delay(mut self, seconds: u32) -> Self {
        self.not_before_delay = Some(seconds);
        self
    }

    /// Sets the leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway = Some(seconds);
        self
    }
}
