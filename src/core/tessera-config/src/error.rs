//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has the wrong shape.
    #[error("invalid settings: {0}")]
    Parse(String),

    /// A directive has an unacceptable value.
    #[error("invalid value for {directive}: {message}")]
    InvalidDirective {
        /// Directive name as written in the file.
        directive: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A location block is unusable.
    #[error("invalid location '{path}': {message}")]
    InvalidLocation {
        /// Location path.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// Two providers share a name.
    #[error("duplicate provider name: {0}")]
    DuplicateProvider(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
