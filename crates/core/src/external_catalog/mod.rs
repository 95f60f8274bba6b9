//! External movie catalog integration.
//!
//! The catalog is the source of truth for movie metadata. The collection only
//! stores what `fetch_by_id` returns at the time a movie is added.

mod omdb;
mod types;

pub use omdb::OmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for external movie catalog clients.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Search for titles by name.
    ///
    /// Results keep the provider's relevance order. No matches is an empty
    /// list, not an error.
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Vec<CatalogSummary>, ExternalCatalogError>;

    /// Fetch full details for a catalog id.
    ///
    /// Fails with [`ExternalCatalogError::NotFound`] if the provider does not
    /// know the id.
    async fn fetch_by_id(&self, external_id: &str) -> Result<CatalogRecord, ExternalCatalogError>;
}
