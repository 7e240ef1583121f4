//! Named provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use tessera_config::ProviderSpec;

use crate::chain::ProviderChain;
use crate::error::AuthError;
use crate::provider::CredentialChecker;
use crate::providers::PasswordFileProvider;

/// Providers registered by name at startup.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn CredentialChecker>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates every declared provider.
    pub fn from_specs(specs: &[ProviderSpec]) -> Result<Self, AuthError> {
        let mut registry = Self::new();
        for spec in specs {
            let provider: Arc<dyn CredentialChecker> = match spec {
                ProviderSpec::PasswordFile { path, .. } => {
                    Arc::new(PasswordFileProvider::load(path)?)
                },
            };
            registry.register(spec.name(), provider);
        }
        Ok(registry)
    }

    /// Registers `provider` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn CredentialChecker>) {
        let name = name.into();
        info!(provider = %name, kind = provider.kind(), "Registered credential provider");
        self.providers.insert(name, provider);
    }

    /// Looks up a provider by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CredentialChecker>> {
        self.providers.get(name)
    }

    /// Resolves `names` into a chain, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownProvider`] for the first name that is not
    /// registered.
    pub fn build_chain<S: AsRef<str>>(&self, names: &[S]) -> Result<ProviderChain, AuthError> {
        names.iter().try_fold(ProviderChain::new(), |chain, name| {
            let name = name.as_ref();
            let provider = self
                .get(name)
                .ok_or_else(|| AuthError::UnknownProvider(name.to_string()))?;
            Ok(chain.with(name, Arc::clone(provider)))
        })
    }
}
