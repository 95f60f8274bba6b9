pub mod collection;
pub mod config;
pub mod external_catalog;
pub mod metrics;
pub mod testing;

pub use collection::{
    Collection, CollectionError, CollectionService, JsonFileStore, MoviePage, MovieRecord,
    MovieStore, StoreError, MAX_USER_RATING,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogBackend, CatalogConfig, Config,
    ConfigError, OmdbConfig, SanitizedConfig, ServerConfig, StoreConfig,
};
pub use external_catalog::{
    normalize_external_id, CatalogRecord, CatalogSummary, ExternalCatalog, ExternalCatalogError,
    OmdbClient,
};
