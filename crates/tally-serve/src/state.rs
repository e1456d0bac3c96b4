//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::cache::{ResponseCache, new_cache};
use crate::config::Config;
use crate::store::SnapshotStore;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot database handle.
    pub store: SnapshotStore,

    /// Response cache consulted before any handler runs.
    pub cache: ResponseCache,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// Fails if the snapshot database cannot be opened.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = SnapshotStore::open(
            &config.db_path,
            config.init_schema,
            config.excluded_countries.clone(),
        )?;
        Ok(Self::with_store(config, store))
    }

    /// Create application state around an existing store.
    pub fn with_store(config: Config, store: SnapshotStore) -> Self {
        let cache = new_cache(config.cache_capacity, config.cache_ttl);

        tracing::info!(
            cache_capacity = config.cache_capacity,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            "application state initialized"
        );

        Self {
            store,
            cache,
            config: Arc::new(config),
        }
    }
}
