//! Application state shared across handlers.

use std::sync::Arc;

use brewzzle_core::{Config, GooglePlacesClient, PlacesProvider, SearchService};

/// Shared application state.
///
/// Immutable after startup; cloning only bumps a reference count.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Alias used by routers and handlers.
pub type SharedState = AppState;

struct AppStateInner {
    config: Config,
    search: SearchService,
}

impl AppState {
    /// Build state backed by the Google Places client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = GooglePlacesClient::new(&config.provider)?;
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// Build state around any provider (used by tests).
    #[must_use]
    pub fn with_provider(config: Config, provider: Arc<dyn PlacesProvider>) -> Self {
        let search = SearchService::new(provider, config.provider.details_concurrency);
        Self {
            inner: Arc::new(AppStateInner { config, search }),
        }
    }

    /// Configuration snapshot taken at startup.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The search orchestrator.
    #[must_use]
    pub fn search(&self) -> &SearchService {
        &self.inner.search
    }
}
