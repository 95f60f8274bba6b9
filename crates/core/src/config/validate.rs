use super::{types::Config, CatalogBackend, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Store path is not empty
/// - The selected catalog backend has a usable section
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.store.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "store.path cannot be empty".to_string(),
        ));
    }

    if let Some(catalog) = &config.catalog {
        match catalog.backend {
            CatalogBackend::Omdb => {
                let Some(omdb) = &catalog.omdb else {
                    return Err(ConfigError::ValidationError(
                        "catalog.backend is \"omdb\" but [catalog.omdb] is missing".to_string(),
                    ));
                };
                if omdb.api_key.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "catalog.omdb.api_key cannot be empty".to_string(),
                    ));
                }
                if omdb.timeout_secs == 0 {
                    return Err(ConfigError::ValidationError(
                        "catalog.omdb.timeout_secs cannot be 0".to_string(),
                    ));
                }
                if omdb.search_limit == 0 {
                    return Err(ConfigError::ValidationError(
                        "catalog.omdb.search_limit cannot be 0".to_string(),
                    ));
                }
            }
        }
    }

    Ok(())
}
