use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Collection store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path of the JSON document holding the collection.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("movies.json")
}

/// External catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog backend type
    pub backend: CatalogBackend,
    /// OMDb-specific configuration (required when backend = "omdb")
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
}

/// Available catalog backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatalogBackend {
    Omdb,
}

/// OMDb catalog backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    /// OMDb API key
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum number of search results returned (default: 10)
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

fn default_timeout() -> u32 {
    10
}

fn default_search_limit() -> u32 {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<SanitizedCatalogConfig>,
}

/// Sanitized catalog config (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb: Option<SanitizedOmdbConfig>,
}

/// Sanitized OMDb config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub search_limit: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            store: config.store.clone(),
            catalog: config.catalog.as_ref().map(|c| SanitizedCatalogConfig {
                backend: match c.backend {
                    CatalogBackend::Omdb => "omdb".to_string(),
                },
                omdb: c.omdb.as_ref().map(|o| SanitizedOmdbConfig {
                    base_url: o.base_url.clone(),
                    api_key_configured: !o.api_key.is_empty(),
                    timeout_secs: o.timeout_secs,
                    search_limit: o.search_limit,
                }),
            }),
        }
    }
}
