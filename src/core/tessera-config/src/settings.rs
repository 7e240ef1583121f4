//! Settings file loading.
//!
//! The file is TOML:
//!
//! ```toml
//! document_root = "public"
//!
//! [server]
//! signature_algorithm = "HS256"
//! signature_secret = "0123456789abcdef0123456789abcdef"
//!
//! [[provider]]
//! name = "file"
//! kind = "password-file"
//! path = "config/users.passwd"
//!
//! [[location]]
//! path = "/login"
//! handler = "login"
//! providers = ["file"]
//!
//! [[location]]
//! path = "/private"
//! auth_type = "jwt"
//! auth_name = "private area"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info};

use tessera_crypto::{SignatureAlgorithm, SigningSecret};

use crate::error::ConfigError;
use crate::resolver::ConfigResolver;
use crate::scope::ScopeConfig;

/// Directory served when the file does not name one.
pub const DEFAULT_DOCUMENT_ROOT: &str = "public";

/// Content handler attached to a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handler {
    /// Accepts posted credentials and answers with a token.
    Login,
}

/// Authentication scheme required by a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    /// Bearer token issued by a login location.
    Jwt,
}

/// A credential provider declared in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProviderSpec {
    /// `user:hash` lines with Argon2 PHC hashes.
    PasswordFile {
        /// Name locations refer to.
        name: String,
        /// Path to the password file.
        path: PathBuf,
    },
}

impl ProviderSpec {
    /// The provider's name.
    pub fn name(&self) -> &str {
        match self {
            Self::PasswordFile { name, .. } => name,
        }
    }
}

/// A URL path prefix with its own configuration scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Path prefix, always starting with `/`.
    pub path: String,
    /// Content handler, if any.
    pub handler: Option<Handler>,
    /// Required authentication, if any.
    pub auth_type: Option<AuthType>,
    /// Realm reported in challenges.
    pub auth_name: Option<String>,
    /// Ordered provider names consulted on login.
    pub providers: Vec<String>,
    /// Token directives declared for this location.
    pub scope: ScopeConfig,
}

impl Location {
    /// Returns true if `request_path` falls under this location.
    ///
    /// Matching is by prefix on a path-segment boundary, so `/private`
    /// covers `/private` and `/private/a` but not `/privateer`.
    pub fn matches(&self, request_path: &str) -> bool {
        match request_path.strip_prefix(self.path.as_str()) {
            Some(rest) => rest.is_empty() || self.path.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Everything loaded from the settings file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Directory static resources are served from.
    pub document_root: PathBuf,
    /// Server-wide token directives.
    pub server: ScopeConfig,
    /// Declared providers, in file order.
    pub providers: Vec<ProviderSpec>,
    /// Declared locations, in file order.
    pub locations: Vec<Location>,
}

impl Settings {
    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = text.parse()?;
        info!(
            path = %path.display(),
            locations = settings.locations.len(),
            providers = settings.providers.len(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Returns the most specific location covering `request_path`.
    pub fn location_for(&self, request_path: &str) -> Option<&Location> {
        self.locations
            .iter()
            .filter(|location| location.matches(request_path))
            .max_by_key(|location| location.path.len())
    }

    /// Returns a resolver merging `location` over the server scope.
    pub fn resolver<'a>(&'a self, location: Option<&'a Location>) -> ConfigResolver<'a> {
        ConfigResolver::new(&self.server, location.map(|location| &location.scope))
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawSettings = toml::from_str(s)?;
        raw.try_into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    document_root: Option<PathBuf>,
    #[serde(default)]
    server: RawScope,
    #[serde(default, rename = "provider")]
    providers: Vec<ProviderSpec>,
    #[serde(default, rename = "location")]
    locations: Vec<RawLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScope {
    signature_algorithm: Option<String>,
    signature_secret: Option<String>,
    issuer: Option<String>,
    subject: Option<String>,
    audience: Option<String>,
    expiry_delay: Option<u32>,
    not_before_delay: Option<u32>,
    leeway: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    path: String,
    handler: Option<Handler>,
    auth_type: Option<AuthType>,
    auth_name: Option<String>,
    #[serde(default)]
    providers: Vec<String>,
    #[serde(flatten)]
    scope: RawScope,
    /// Keys no other field claimed; `scope` must stay declared first.
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let mut names = HashSet::new();
        for provider in &raw.providers {
            if !names.insert(provider.name()) {
                return Err(ConfigError::DuplicateProvider(provider.name().to_string()));
            }
        }

        let locations = raw
            .locations
            .into_iter()
            .map(Location::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let mut paths = HashSet::new();
        for location in &locations {
            if !paths.insert(location.path.as_str()) {
                return Err(ConfigError::InvalidLocation {
                    path: location.path.clone(),
                    message: "declared more than once".into(),
                });
            }
        }

        Ok(Self {
            document_root: raw
                .document_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_ROOT)),
            server: raw.server.try_into()?,
            providers: raw.providers,
            locations,
        })
    }
}

impl TryFrom<RawLocation> for Location {
    type Error = ConfigError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        if !raw.path.starts_with('/') {
            return Err(ConfigError::InvalidLocation {
                path: raw.path,
                message: "path must start with '/'".into(),
            });
        }
        if let Some(key) = raw.unknown.keys().next() {
            return Err(ConfigError::InvalidLocation {
                path: raw.path,
                message: format!("unknown directive '{}'", key),
            });
        }
        if raw.handler == Some(Handler::Login) && raw.auth_type.is_some() {
            return Err(ConfigError::InvalidLocation {
                path: raw.path,
                message: "a login location cannot itself require a token".into(),
            });
        }

        let scope = raw.scope.try_into()?;
        debug!(path = %raw.path, providers = ?raw.providers, "Location configured");

        Ok(Self {
            path: raw.path,
            handler: raw.handler,
            auth_type: raw.auth_type,
            auth_name: raw.auth_name,
            providers: raw.providers,
            scope,
        })
    }
}

impl TryFrom<RawScope> for ScopeConfig {
    type Error = ConfigError;

    fn try_from(raw: RawScope) -> Result<Self, Self::Error> {
        let signature_algorithm = match raw.signature_algorithm.as_deref() {
            None | Some("") => None,
            Some(name) => Some(name.parse::<SignatureAlgorithm>().map_err(|e| {
                ConfigError::InvalidDirective {
                    directive: "signature_algorithm",
                    message: e.to_string(),
                }
            })?),
        };

        Ok(Self {
            signature_algorithm,
            signature_secret: raw.signature_secret.map(SigningSecret::new),
            issuer: raw.issuer,
            subject: raw.subject,
            audience: raw.audience,
            expiry_delay: raw.expiry_delay,
            not_before_delay: raw.not_before_delay,
            leeway: raw.leeway,
        })
    }
}
