use std::sync::Arc;

use log::info;
use tokio::runtime::Handle;

use super::Searcher;
use crate::error::SearcherError;
use crate::provider::SearchProvider;
use crate::store::CacheStore;

/// A builder for constructing a Searcher with a fluent interface.
#[derive(Default)]
pub struct SearcherBuilder {
    store: Option<CacheStore>,
    provider: Option<Arc<dyn SearchProvider>>,
    runtime: Option<Handle>,
}

impl SearcherBuilder {
    /// Creates a new empty SearcherBuilder. Without a store, the default
    /// cache directory is used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets where the cache is loaded from and saved to
    pub fn with_store(mut self, store: CacheStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the provider that performs live searches
    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the runtime search tasks are spawned on. Defaults to the runtime
    /// `build` is called from.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Loads the cache and returns the searcher.
    ///
    /// # Errors
    /// * `SearcherError::Build` if no provider was set, or no runtime was set
    ///   and `build` is not called from within a Tokio runtime
    pub fn build(self) -> Result<Searcher, SearcherError> {
        let provider = self
            .provider
            .ok_or_else(|| SearcherError::Build("No search provider set".to_string()))?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|e| {
                SearcherError::Build(format!("No Tokio runtime available: {}", e))
            })?,
        };

        let store = self.store.unwrap_or_else(CacheStore::new_default);
        info!("Building searcher with store {:?}", store.config().preferences_path);
        Ok(Searcher::from_parts(store, provider, runtime))
    }
}
