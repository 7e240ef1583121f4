//! Per-request resolution of location and server settings.

use tessera_crypto::{SignatureAlgorithm, SigningSecret};

use crate::scope::ScopeConfig;

/// Expiry delay used when no scope configures one.
pub const DEFAULT_EXPIRY_DELAY: u32 = 3600;

/// Leeway used when no scope configures one.
pub const DEFAULT_LEEWAY: u32 = 0;

/// A configurable token directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `signature_algorithm`
    SignatureAlgorithm,
    /// `signature_secret`
    SignatureSecret,
    /// `issuer`
    Issuer,
    /// `subject`
    Subject,
    /// `audience`
    Audience,
    /// `expiry_delay`
    ExpiryDelay,
    /// `not_before_delay`
    NotBeforeDelay,
    /// `leeway`
    Leeway,
}

/// A resolved directive value, borrowed from the scope that supplied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectiveValue<'a> {
    /// An algorithm.
    Algorithm(SignatureAlgorithm),
    /// A signing secret.
    Secret(&'a SigningSecret),
    /// Free text (issuer, subject, audience).
    Text(&'a str),
    /// A duration in seconds.
    Seconds(u32),
}

/// Merges a location scope over the server scope.
///
/// Resolution is pure and is recomputed on every lookup.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    server: &'a ScopeConfig,
    directory: Option<&'a ScopeConfig>,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver for a request matched to `directory`, if any.
    pub fn new(server: &'a ScopeConfig, directory: Option<&'a ScopeConfig>) -> Self {
        Self { server, directory }
    }

    /// Returns the effective value of `directive`, or `None` when unset at
    /// both scopes.
    pub fn resolve(&self, directive: Directive) -> Option<DirectiveValue<'a>> {
        self.directory
            .and_then(|scope| scope_value(scope, directive))
            .or_else(|| scope_value(self.server, directive))
    }

    /// Effective signature algorithm.
    pub fn algorithm(&self) -> Option<SignatureAlgorithm> {
        match self.resolve(Directive::SignatureAlgorithm) {
            Some(DirectiveValue::Algorithm(algorithm)) => Some(algorithm),
            _ => None,
        }
    }

    /// Effective signing secret.
    pub fn secret(&self) -> Option<&'a SigningSecret> {
        match self.resolve(Directive::SignatureSecret) {
            Some(DirectiveValue::Secret(secret)) => Some(secret),
            _ => None,
        }
    }

    /// Effective issuer.
    pub fn issuer(&self) -> Option<&'a str> {
        self.text(Directive::Issuer)
    }

    /// Effective subject.
    pub fn subject(&self) -> Option<&'a str> {
        self.text(Directive::Subject)
    }

    /// Effective audience.
    pub fn audience(&self) -> Option<&'a str> {
        self.text(Directive::Audience)
    }

    /// Effective expiry delay, [`DEFAULT_EXPIRY_DELAY`] when unset.
    pub fn expiry_delay(&self) -> u32 {
        self.seconds(Directive::ExpiryDelay)
            .unwrap_or(DEFAULT_EXPIRY_DELAY)
    }

    /// Effective not-before delay; `None` means no `nbf` claim.
    pub fn not_before_delay(&self) -> Option<u32> {
        self.seconds(Directive::NotBeforeDelay)
    }

    /// Effective leeway, [`DEFAULT_LEEWAY`] when unset.
    pub fn leeway(&self) -> u32 {
        self.seconds(Directive::Leeway).unwrap_or(DEFAULT_LEEWAY)
    }

    /// Resolves every directive at once.
    pub fn effective(&self) -> EffectiveConfig<'a> {
        EffectiveConfig {
            algorithm: self.algorithm(),
            secret: self.secret(),
            issuer: self.issuer(),
            subject: self.subject(),
            audience: self.audience(),
            expiry_delay: self.expiry_delay(),
            not_before_delay: self.not_before_delay(),
            leeway: self.leeway(),
        }
    }

    fn text(&self, directive: Directive) -> Option<&'a str> {
        match self.resolve(directive) {
            Some(DirectiveValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    fn seconds(&self, directive: Directive) -> Option<u32> {
        match self.resolve(directive) {
            Some(DirectiveValue::Seconds(seconds)) => Some(seconds),
            _ => None,
        }
    }
}

/// The settings in effect for one request.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveConfig<'a> {
    /// Signature algorithm, if configured.
    pub algorithm: Option<SignatureAlgorithm>,
    /// Signing secret, if configured.
    pub secret: Option<&'a SigningSecret>,
    /// Issuer, if configured.
    pub issuer: Option<&'a str>,
    /// Subject, if configured.
    pub subject: Option<&'a str>,
    /// Audience, if configured.
    pub audience: Option<&'a str>,
    /// Expiry delay (defaulted).
    pub expiry_delay: u32,
    /// Not-before delay, if configured.
    pub not_before_delay: Option<u32>,
    /// Leeway (defaulted).
    pub leeway: u32,
}

/// Reads one directive from one scope. Empty text and empty secrets count
/// as unset.
fn scope_value(scope: &ScopeConfig, directive: Directive) -> Option<DirectiveValue<'_>> {
    match directive {
        Directive::SignatureAlgorithm => scope.signature_algorithm.map(DirectiveValue::Algorithm),
        Directive::SignatureSecret => scope
            .signature_secret
            .as_ref()
            .filter(|secret| !secret.is_empty())
            .map(DirectiveValue::Secret),
        Directive::Issuer => non_empty(&scope.issuer),
        Directive::Subject => non_empty(&scope.subject),
        Directive::Audience => non_empty(&scope.audience),
        Directive::ExpiryDelay => scope.expiry_delay.map(DirectiveValue::Seconds),
        Directive::NotBeforeDelay => scope.not_before_delay.map(DirectiveValue::Seconds),
        Directive::Leeway => scope.leeway.map(DirectiveValue::Seconds),
    }
}

fn non_empty(value: &Option<String>) -> Option<DirectiveValue<'_>> {
    value
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(DirectiveValue::Text)
}
