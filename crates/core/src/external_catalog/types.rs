//! Types for external catalog responses.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static EXTERNAL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tt\d{7,}$").expect("valid external id regex"));

/// Normalize an IMDb-style catalog id.
///
/// Accepts `tt0111161`, `TT0111161` and bare `0111161`. Returns `None` for
/// anything that does not look like a catalog id.
pub fn normalize_external_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_ascii_lowercase();
    let candidate = if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("tt{}", trimmed)
    } else {
        trimmed
    };

    EXTERNAL_ID_PATTERN
        .is_match(&candidate)
        .then_some(candidate)
}

/// A search hit from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSummary {
    /// Catalog id (e.g. `tt0111161`).
    pub external_id: String,
    /// Title as listed by the catalog.
    pub title: String,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Poster URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

/// Full catalog details for one title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    /// Catalog id (e.g. `tt0111161`).
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Poster URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Catalog rating (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// Short plot summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_summary: Option<String>,
}
