//! # Tessera Config
//!
//! Two-level configuration for token issuance and validation.
//!
//! Settings are declared server-wide and may be overridden per location (a
//! URL path prefix). For every request the [`ConfigResolver`] picks, per
//! directive, the location value if it is set and non-empty, otherwise the
//! server value, otherwise "unset".
//!
//! Scope records are built once when the settings file is loaded and are
//! never mutated afterwards, so they can be shared freely between requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod resolver;
pub mod scope;
pub mod settings;

pub use error::ConfigError;
pub use resolver::{ConfigResolver, Directive, DirectiveValue, EffectiveConfig};
pub use scope::ScopeConfig;
pub use settings::{AuthType, Handler, Location, ProviderSpec, Settings};
