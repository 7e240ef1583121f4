//! Token claim sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Registered and private claim names used by Tessera tokens.
pub mod names {
    /// Authenticated user name.
    pub const USER: &str = "user";
    /// Issued-at time.
    pub const ISSUED_AT: &str = "iat";
    /// Expiration time.
    pub const EXPIRES_AT: &str = "exp";
    /// Not-before time.
    pub const NOT_BEFORE: &str = "nbf";
    /// Issuer.
    pub const ISSUER: &str = "iss";
    /// Subject.
    pub const SUBJECT: &str = "sub";
    /// Audience.
    pub const AUDIENCE: &str = "aud";
}

/// A token's claim set: unique names mapped to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a claim, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the raw value of a claim.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a claim if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns true if the claim is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Reads a time claim as whole seconds since the epoch.
    ///
    /// Integers and decimal strings are both accepted; the latter is how
    /// older issuers wrote every claim.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Malformed`] if the claim exists but holds
    /// anything else.
    pub fn time(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(ValidationError::Malformed),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ValidationError::Malformed),
            Some(_) => Err(ValidationError::Malformed),
        }
    }

    /// The `user` claim, if present and a string.
    pub fn user(&self) -> Option<&str> {
        self.get_str(names::USER)
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no claims.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consumes the claim set, returning the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
