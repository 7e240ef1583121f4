//! Token issuance and verification.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use tracing::{debug, warn};

use tessera_crypto::SignatureAlgorithm;

use crate::claims::{names, Claims};
use crate::error::{TokenError, ValidationError};

/// What to put in a freshly issued token.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest<'a> {
    /// Authenticated user name, stored in the `user` claim.
    pub user: &'a str,
    /// `iss` claim.
    pub issuer: Option<&'a str>,
    /// `sub` claim.
    pub subject: Option<&'a str>,
    /// `aud` claim.
    pub audience: Option<&'a str>,
    /// Seconds from issuance until `exp`. `None` omits `exp`.
    pub expiry_delay: Option<u32>,
    /// Seconds from issuance until `nbf`. `None` omits `nbf`.
    pub not_before_delay: Option<u32>,
}

/// What a presented token is checked against.
#[derive(Debug, Clone, Default)]
pub struct Expectations<'a> {
    /// Expected `iss`, compared only if the token carries one.
    pub issuer: Option<&'a str>,
    /// Expected `aud`, compared only if the token carries one.
    pub audience: Option<&'a str>,
    /// Expected `sub`, compared only if the token carries one.
    pub subject: Option<&'a str>,
    /// Clock skew tolerance applied to `exp` and `nbf`.
    pub leeway: u32,
}

/// Signs and verifies tokens for one algorithm/secret pair.
///
/// The secret is borrowed for the lifetime of the codec, which is expected
/// to be a single issue or verify call.
pub struct TokenCodec<'a> {
    algorithm: SignatureAlgorithm,
    secret: &'a [u8],
}

impl<'a> TokenCodec<'a> {
    /// Creates a codec after checking the key-length invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Key`] if `secret` does not have exactly the
    /// length `algorithm` requires.
    pub fn new(algorithm: SignatureAlgorithm, secret: &'a [u8]) -> Result<Self, TokenError> {
        if let Err(e) = algorithm.check_key(secret) {
            warn!(%algorithm, error = %e, "refusing signing secret");
            return Err(e.into());
        }
        Ok(Self { algorithm, secret })
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Builds, signs and serializes a token issued at `now`.
    pub fn issue(&self, request: &IssueRequest<'_>, now: i64) -> Result<String, TokenError> {
        let claims = build_claims(request, now);
        let header = Header::new(jwt_algorithm(self.algorithm.signing_primitive()));
        let key = EncodingKey::from_secret(self.secret);

        let token = encode(&header, &claims, &key).map_err(|e| TokenError::Signing(e.to_string()))?;
        debug!(user = request.user, algorithm = %self.algorithm, "issued token");
        Ok(token)
    }

    /// Verifies `token` at time `now` and returns its full claim set.
    pub fn verify(
        &self,
        token: &str,
        expected: &Expectations<'_>,
        now: i64,
    ) -> Result<Claims, TokenError> {
        reject_unsigned(token)?;

        let primitive = jwt_algorithm(self.algorithm.signing_primitive());
        let mut validation = Validation::new(primitive);
        // Registered claims are checked below with our own skip and leeway rules.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let key = DecodingKey::from_secret(self.secret);
        let claims = decode::<Claims>(token, &key, &validation)
            .map_err(|e| {
                debug!(error = %e, "token decoding failed");
                ValidationError::Malformed
            })?
            .claims;

        check_claims(&claims, expected, now)?;
        Ok(claims)
    }
}

fn build_claims(request: &IssueRequest<'_>, now: i64) -> Claims {
    let mut claims = Claims::new();

    if let Some(delay) = request.expiry_delay {
        claims.insert(names::EXPIRES_AT, now.saturating_add(i64::from(delay)));
    }
    if let Some(delay) = request.not_before_delay {
        claims.insert(names::NOT_BEFORE, now.saturating_add(i64::from(delay)));
    }
    claims.insert(names::ISSUED_AT, now);

    if let Some(issuer) = request.issuer {
        claims.insert(names::ISSUER, issuer);
    }
    if let Some(subject) = request.subject {
        claims.insert(names::SUBJECT, subject);
    }
    if let Some(audience) = request.audience {
        claims.insert(names::AUDIENCE, audience);
    }
    claims.insert(names::USER, request.user);

    claims
}

fn check_claims(claims: &Claims, expected: &Expectations<'_>, now: i64) -> Result<(), ValidationError> {
    if !claim_matches(claims.get(names::ISSUER), expected.issuer, false) {
        return Err(ValidationError::IssuerMismatch);
    }
    if !claim_matches(claims.get(names::AUDIENCE), expected.audience, true) {
        return Err(ValidationError::AudienceMismatch);
    }
    if !claim_matches(claims.get(names::SUBJECT), expected.subject, false) {
        return Err(ValidationError::SubjectMismatch);
    }

    let leeway = i64::from(expected.leeway);

    let exp = claims
        .time(names::EXPIRES_AT)?
        .ok_or(ValidationError::MissingExpiry)?;
    if exp.saturating_add(leeway) < now {
        return Err(ValidationError::Expired);
    }

    if let Some(nbf) = claims.time(names::NOT_BEFORE)? {
        if nbf.saturating_sub(leeway) > now {
            return Err(ValidationError::NotYetValid);
        }
    }

    Ok(())
}

/// A claim matches when either side is absent, or the values are equal.
///
/// Only string claims (and, for `aud`, lists) are compared. Claims of any
/// other JSON type are treated as absent.
fn claim_matches(actual: Option<&Value>, expected: Option<&str>, allow_list: bool) -> bool {
    let (Some(actual), Some(expected)) = (actual, expected) else {
        return true;
    };
    match actual {
        Value::String(value) => value == expected,
        Value::Array(items) if allow_list => items.iter().any(|item| item.as_str() == Some(expected)),
        _ => true,
    }
}

/// Refuses tokens whose header declares `alg: none`.
///
/// This runs on the raw header, before the JWS library sees the token, so
/// it does not depend on how the library treats unsigned tokens.
fn reject_unsigned(token: &str) -> Result<(), ValidationError> {
    let encoded = token.split('.').next().unwrap_or_default();
    let raw = BASE64URL
        .decode(encoded.trim_end_matches('='))
        .map_err(|_| ValidationError::Malformed)?;
    let header: Value = serde_json::from_slice(&raw).map_err(|_| ValidationError::Malformed)?;

    let alg = header
        .get("alg")
        .and_then(Value::as_str)
        .ok_or(ValidationError::Malformed)?;
    if alg.eq_ignore_ascii_case("none") {
        warn!("rejecting token signed with the 'none' algorithm");
        return Err(ValidationError::UnsignedAlgorithm);
    }
    Ok(())
}

fn jwt_algorithm(algorithm: SignatureAlgorithm) -> Algorithm {
    match algorithm {
        SignatureAlgorithm::Hs256 => Algorithm::HS256,
        SignatureAlgorithm::Hs384 => Algorithm::HS384,
        SignatureAlgorithm::Hs512 => Algorithm::HS512,
    }
}
