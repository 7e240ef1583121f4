//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use tessera_auth::{AuthEngine, AuthError, ProviderChain, ProviderRegistry};
use tessera_config::{EffectiveConfig, Location, Settings};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    settings: Settings,
    engine: AuthEngine,
    chains: HashMap<String, ProviderChain>,
}

impl AppState {
    /// Builds state from loaded settings, instantiating the declared
    /// providers.
    pub fn from_settings(settings: Settings) -> Result<Self, AuthError> {
        let registry = ProviderRegistry::from_specs(&settings.providers)?;
        Self::new(settings, &registry, AuthEngine::default())
    }

    /// Builds state with an explicit registry and engine.
    ///
    /// Every location's provider names are resolved here, once.
    pub fn new(
        settings: Settings,
        registry: &ProviderRegistry,
        engine: AuthEngine,
    ) -> Result<Self, AuthError> {
        let mut chains = HashMap::new();
        for location in &settings.locations {
            let chain = registry.build_chain(location.providers.as_slice())?;
            info!(location = %location.path, providers = ?chain, "Provider chain ready");
            chains.insert(location.path.clone(), chain);
        }

        Ok(Self {
            inner: Arc::new(Inner {
                settings,
                engine,
                chains,
            }),
        })
    }

    /// Loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// The authentication engine.
    pub fn engine(&self) -> &AuthEngine {
        &self.inner.engine
    }

    /// Location matching `path`, if any.
    pub fn location_for(&self, path: &str) -> Option<&Location> {
        self.inner.settings.location_for(path)
    }

    /// Effective configuration for `location`.
    pub fn effective<'a>(&'a self, location: Option<&'a Location>) -> EffectiveConfig<'a> {
        self.inner.settings.resolver(location).effective()
    }

    /// Provider chain of `location`; empty outside any location.
    pub fn chain_for(&self, location: Option<&Location>) -> ProviderChain {
        location
            .and_then(|location| self.inner.chains.get(&location.path))
            .cloned()
            .unwrap_or_default()
    }
}
