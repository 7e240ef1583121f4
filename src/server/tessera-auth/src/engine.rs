//! Login and resource-access orchestration.
//!
//! The engine receives already-parsed inputs (form fields, the raw
//! `Authorization` header value) together with the effective configuration
//! of the request, and returns either a result or a [`Rejection`] that says
//! how the client must be answered.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use tessera_config::EffectiveConfig;
use tessera_crypto::{SignatureAlgorithm, SigningSecret};
use tessera_token::{Clock, Expectations, IssueRequest, SystemClock, TokenCodec};

use crate::chain::ProviderChain;
use crate::challenge::{Challenge, ChallengeError};
use crate::context::AuthContext;
use crate::error::{AuthError, Outcome};
use crate::provider::Decision;

const BEARER_PREFIX: &str = "Bearer ";

const MISSING_USERNAME: &str = "Username was not in token";

const INVALID_SCHEME: &str = "Authentication type must be Bearer";

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// The compact signed token.
    pub token: String,
}

/// A refused resource access.
#[derive(Debug)]
pub struct Rejection {
    /// Why the request was refused.
    pub error: AuthError,
    /// Challenge to send back, if the failure is the client's.
    pub challenge: Option<Challenge>,
}

impl Rejection {
    fn internal(error: AuthError) -> Self {
        Self {
            error,
            challenge: None,
        }
    }

    fn challenged(error: AuthError, challenge: Challenge) -> Self {
        Self {
            error,
            challenge: Some(challenge),
        }
    }

    /// How the request is answered.
    pub fn outcome(&self) -> Outcome {
        self.error.outcome()
    }
}

/// Issues tokens on login and checks them on resource access.
#[derive(Clone)]
pub struct AuthEngine {
    clock: Arc<dyn Clock>,
}

impl Default for AuthEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl AuthEngine {
    /// Creates an engine reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Checks a username/password pair against `chain` and issues a token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] if a field is missing or no
    ///   provider grants the pair.
    /// - [`AuthError::Provider`] if a provider fails.
    /// - [`AuthError::Configuration`] if no usable secret or algorithm is
    ///   configured.
    pub fn login(
        &self,
        config: &EffectiveConfig<'_>,
        chain: &ProviderChain,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginResponse, AuthError> {
        let (Some(username), Some(password)) = (username, password) else {
            debug!("login form is missing user or password");
            return Err(AuthError::InvalidCredentials);
        };

        match chain.authenticate(username, password) {
            Decision::Granted => {},
            Decision::Denied => {
                warn!(user = username, "authentication failure: password mismatch");
                return Err(AuthError::InvalidCredentials);
            },
            Decision::UserNotFound => {
                warn!(user = username, "authentication failure: user not found");
                return Err(AuthError::InvalidCredentials);
            },
            Decision::Error(message) => {
                error!(user = username, error = %message, "credential provider failed");
                return Err(AuthError::Provider(message));
            },
        }

        let token = self.issue(config, username)?;
        info!(user = username, "Login succeeded");
        Ok(LoginResponse { token })
    }

    /// Issues a token for `username` under `config`, without checking
    /// credentials.
    pub fn issue(&self, config: &EffectiveConfig<'_>, username: &str) -> Result<String, AuthError> {
        let (algorithm, secret) = signing_pair(config)?;
        let codec = TokenCodec::new(algorithm, secret.as_bytes())?;
        let request = IssueRequest {
            user: username,
            issuer: config.issuer,
            subject: config.subject,
            audience: config.audience,
            expiry_delay: Some(config.expiry_delay),
            not_before_delay: config.not_before_delay,
        };
        Ok(codec.issue(&request, self.clock.now())?)
    }

    /// Authorizes a request to a location protected by `realm`.
    ///
    /// `authorization` is the raw `Authorization` header value, if sent.
    pub fn authorize(
        &self,
        config: &EffectiveConfig<'_>,
        realm: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<AuthContext, Rejection> {
        let Some(realm) = realm.filter(|realm| !realm.is_empty()) else {
            error!("protected location has no auth_name");
            return Err(Rejection::internal(AuthError::Configuration(
                "auth_name is required on protected locations".into(),
            )));
        };
        if config.secret.is_none() {
            error!(realm, "signature_secret is not configured");
            return Err(Rejection::internal(AuthError::Configuration(
                "signature_secret is not configured".into(),
            )));
        }

        let Some(header) = authorization else {
            debug!(realm, "no credentials presented");
            return Err(Rejection::challenged(
                AuthError::MissingToken,
                Challenge::new(realm),
            ));
        };

        let token = match header.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.is_empty() => token,
            _ => {
                warn!(realm, "authorization scheme is not Bearer");
                return Err(Rejection::challenged(
                    AuthError::InvalidScheme,
                    Challenge::new(realm).with_error(ChallengeError::InvalidRequest, INVALID_SCHEME),
                ));
            },
        };

        let (algorithm, secret) = signing_pair(config).map_err(Rejection::internal)?;
        let codec = TokenCodec::new(algorithm, secret.as_bytes())
            .map_err(|e| Rejection::internal(e.into()))?;
        let expected = Expectations {
            issuer: config.issuer,
            audience: config.audience,
            subject: config.subject,
            leeway: config.leeway,
        };

        let claims = codec
            .verify(token, &expected, self.clock.now())
            .map_err(|e| match AuthError::from(e) {
                AuthError::InvalidToken(reason) => {
                    warn!(realm, reason = %reason, "token refused");
                    Rejection::challenged(
                        AuthError::InvalidToken(reason),
                        Challenge::new(realm)
                            .with_error(ChallengeError::InvalidToken, reason.description()),
                    )
                },
                other => {
                    error!(realm, error = %other, "token verification failed");
                    Rejection::internal(other)
                },
            })?;

        let Some(user) = claims.user().map(str::to_string) else {
            warn!(realm, "username was not in token");
            return Err(Rejection::challenged(
                AuthError::MissingUsername,
                Challenge::new(realm).with_error(ChallengeError::InvalidToken, MISSING_USERNAME),
            ));
        };

        debug!(realm, user = %user, "token accepted");
        Ok(AuthContext { user, claims })
    }
}

fn signing_pair<'a>(
    config: &EffectiveConfig<'a>,
) -> Result<(SignatureAlgorithm, &'a SigningSecret), AuthError> {
    let secret = config.secret.ok_or_else(|| {
        error!("signature_secret is not configured");
        AuthError::Configuration("signature_secret is not configured".into())
    })?;
    let algorithm = config.algorithm.ok_or_else(|| {
        error!("signature_algorithm is not configured");
        AuthError::Configuration("signature_algorithm is not configured".into())
    })?;
    Ok((algorithm, secret))
}
