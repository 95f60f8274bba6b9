//! OMDb (Open Movie Database) API client.
//!
//! OMDb is keyed by IMDb ids and requires an API key.
//! Missing values come back as the literal string "N/A".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use super::types::{CatalogRecord, CatalogSummary};
use super::{ExternalCatalog, ExternalCatalogError};
use crate::config::OmdbConfig;

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";

/// OMDb returns at most this many hits per search page.
const SEARCH_PAGE_SIZE: usize = 10;

/// OMDb refuses pages past 100.
const MAX_SEARCH_PAGES: u32 = 100;

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    search_limit: usize,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: &OmdbConfig) -> Result<Self, ExternalCatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(ExternalCatalogError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            search_limit: config.search_limit.max(1) as usize,
        })
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Response, ExternalCatalogError> {
        let url = format!("{}/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(ExternalCatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    async fn search_page(
        &self,
        title: &str,
        page: u32,
    ) -> Result<Option<OmdbSearchResponse>, ExternalCatalogError> {
        let page = page.to_string();
        let response = self
            .request(&[("s", title), ("page", page.as_str())])
            .await?;

        let search: OmdbSearchResponse = response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        if search.is_success() {
            return Ok(Some(search));
        }

        match ProviderError::classify(search.error.as_deref()) {
            ProviderError::NoMatch => Ok(None),
            other => Err(other.into_error()),
        }
    }
}

#[async_trait]
impl ExternalCatalog for OmdbClient {
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Vec<CatalogSummary>, ExternalCatalogError> {
        debug!("OMDb search: title='{}', limit={}", title, self.search_limit);

        let mut results = Vec::new();
        let mut page = 1;

        while results.len() < self.search_limit && page <= MAX_SEARCH_PAGES {
            let Some(search) = self.search_page(title, page).await? else {
                break;
            };

            let total = search.total_results();
            let hits = search.search.len();
            results.extend(search.search.into_iter().map(CatalogSummary::from));

            if hits < SEARCH_PAGE_SIZE || results.len() >= total {
                break;
            }
            page += 1;
        }

        results.truncate(self.search_limit);
        Ok(results)
    }

    async fn fetch_by_id(&self, external_id: &str) -> Result<CatalogRecord, ExternalCatalogError> {
        debug!("OMDb fetch: id={}", external_id);

        let response = self
            .request(&[("i", external_id), ("plot", "short")])
            .await?;

        let details: OmdbTitleDetails = response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse title response: {}", e))
        })?;

        if !details.is_success() {
            return Err(match ProviderError::classify(details.error.as_deref()) {
                ProviderError::NoMatch => {
                    ExternalCatalogError::NotFound(format!("Title {}", external_id))
                }
                other => other.into_error(),
            });
        }

        CatalogRecord::try_from(details)
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults", default)]
    total_results: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl OmdbSearchResponse {
    fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    fn total_results(&self) -> usize {
        self.total_results
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(self.search.len())
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbTitleDetails {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot", default)]
    plot: Option<String>,
}

impl OmdbTitleDetails {
    fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Error messages OMDb reports with `"Response": "False"` and HTTP 200.
#[derive(Debug, PartialEq)]
enum ProviderError {
    NoMatch,
    InvalidKey,
    RateLimited,
    Other(String),
}

impl ProviderError {
    fn classify(message: Option<&str>) -> Self {
        let message = message.unwrap_or("Unknown OMDb error");
        let lower = message.to_ascii_lowercase();

        if lower.contains("not found")
            || lower.contains("incorrect imdb id")
            || lower.contains("error getting data")
        {
            ProviderError::NoMatch
        } else if lower.contains("api key") {
            ProviderError::InvalidKey
        } else if lower.contains("limit reached") {
            ProviderError::RateLimited
        } else {
            ProviderError::Other(message.to_string())
        }
    }

    fn into_error(self) -> ExternalCatalogError {
        match self {
            ProviderError::NoMatch => ExternalCatalogError::NotFound("No match".to_string()),
            ProviderError::InvalidKey => {
                ExternalCatalogError::NotConfigured("Invalid OMDb API key".to_string())
            }
            ProviderError::RateLimited => ExternalCatalogError::RateLimitExceeded,
            ProviderError::Other(message) => ExternalCatalogError::ApiError {
                status: 200,
                message,
            },
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Map OMDb's "N/A" placeholder (and blanks) to `None`.
fn known(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("n/a"))
}

/// Leading year of values like "1994" or "2005–2008".
fn parse_year(value: Option<String>) -> Option<u32> {
    let value = known(value)?;
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_rating(value: Option<String>) -> Option<f32> {
    known(value).and_then(|v| v.parse().ok())
}

impl From<OmdbSearchItem> for CatalogSummary {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            external_id: item.imdb_id,
            title: item.title,
            year: parse_year(item.year),
            cover_url: known(item.poster),
        }
    }
}

impl TryFrom<OmdbTitleDetails> for CatalogRecord {
    type Error = ExternalCatalogError;

    fn try_from(d: OmdbTitleDetails) -> Result<Self, Self::Error> {
        let external_id = known(d.imdb_id).ok_or_else(|| {
            ExternalCatalogError::ParseError("Title response has no imdbID".to_string())
        })?;
        let title = known(d.title).ok_or_else(|| {
            ExternalCatalogError::ParseError("Title response has no Title".to_string())
        })?;

        Ok(Self {
            external_id,
            title,
            year: parse_year(d.year),
            cover_url: known(d.poster),
            rating: parse_rating(d.imdb_rating),
            plot_summary: known(d.plot),
        })
    }
}
