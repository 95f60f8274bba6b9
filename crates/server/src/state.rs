use std::sync::Arc;
use watchlist_core::{CollectionService, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    collection: Arc<CollectionService>,
}

impl AppState {
    pub fn new(config: Config, collection: Arc<CollectionService>) -> Self {
        Self { config, collection }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn collection(&self) -> &CollectionService {
        self.collection.as_ref()
    }
}
