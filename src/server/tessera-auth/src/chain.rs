//! Ordered provider chain.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::provider::{CredentialChecker, Decision};

/// An ordered, immutable list of named providers.
///
/// Providers are tried in insertion order until one returns something other
/// than [`Decision::UserNotFound`].
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<(String, Arc<dyn CredentialChecker>)>,
}

impl ProviderChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider and returns the chain.
    pub fn with(mut self, name: impl Into<String>, provider: Arc<dyn CredentialChecker>) -> Self {
        self.providers.push((name.into(), provider));
        self
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(name, _)| name.as_str())
    }

    /// Walks the chain for `username`.
    pub fn authenticate(&self, username: &str, password: &str) -> Decision {
        if self.providers.is_empty() {
            warn!(user = username, "no credential provider configured");
            return Decision::UserNotFound;
        }

        for (name, provider) in &self.providers {
            let decision = provider.check_credentials(username, password);
            debug!(
                provider = %name,
                kind = provider.kind(),
                user = username,
                ?decision,
                "provider answered"
            );
            if decision != Decision::UserNotFound {
                return decision;
            }
        }

        Decision::UserNotFound
    }
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
