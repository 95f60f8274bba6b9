//! Movie records and the collection document.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::external_catalog::{normalize_external_id, CatalogRecord};

/// Placeholder shown for values the catalog did not provide.
pub const UNKNOWN: &str = "N/A";

/// One entry in the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// Locally assigned id, unique within the collection.
    pub id: u32,
    /// Catalog id (e.g. `tt0111161`), unique within the collection.
    #[serde(alias = "imdb_id")]
    pub external_id: String,
    /// Title.
    pub title: String,
    /// Release year.
    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<u32>,
    /// Poster URL as returned by the catalog.
    #[serde(default, deserialize_with = "lenient::text")]
    pub cover_url: Option<String>,
    /// Catalog rating (0-10).
    #[serde(alias = "rating", default, deserialize_with = "lenient::rating")]
    pub catalog_rating: Option<f32>,
    /// Rating given by the community, unset until rated.
    #[serde(default, deserialize_with = "lenient::user_rating")]
    pub user_rating: Option<u8>,
    /// Short plot summary.
    #[serde(alias = "plot_outline", default, deserialize_with = "lenient::text")]
    pub plot_summary: Option<String>,
    /// When the movie was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl MovieRecord {
    /// Build a new, unrated record from fresh catalog details.
    pub fn from_catalog(id: u32, external_id: String, details: CatalogRecord) -> Self {
        Self {
            id,
            external_id,
            title: details.title,
            year: details.year,
            cover_url: details.cover_url,
            catalog_rating: details.rating,
            user_rating: None,
            plot_summary: details.plot_summary,
            added_at: Some(Utc::now()),
        }
    }

    /// Cover URL, only if it is a well-formed http(s) URL.
    pub fn display_cover_url(&self) -> Option<&str> {
        let raw = self.cover_url.as_deref()?;
        let url = Url::parse(raw).ok()?;
        let renderable = matches!(url.scheme(), "http" | "https") && url.has_host();
        renderable.then_some(raw)
    }

    pub fn display_year(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn display_catalog_rating(&self) -> String {
        self.catalog_rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn display_user_rating(&self) -> String {
        self.user_rating
            .map(|r| format!("{}/10", r))
            .unwrap_or_else(|| "Not rated".to_string())
    }

    pub fn display_plot_summary(&self) -> &str {
        self.plot_summary.as_deref().unwrap_or(UNKNOWN)
    }

    /// Whether this record refers to the given (normalized) catalog id.
    ///
    /// Records written before ids were normalized may hold a bare numeric id,
    /// so the stored value is normalized before comparing.
    pub fn matches_external_id(&self, normalized: &str) -> bool {
        match normalize_external_id(&self.external_id) {
            Some(stored) => stored == normalized,
            None => self.external_id == normalized,
        }
    }
}

/// The whole persisted collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub movies: Vec<MovieRecord>,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Id for the next record: one past the current maximum, or 1 when empty.
    ///
    /// `None` once the maximum id is `u32::MAX`.
    pub fn next_id(&self) -> Option<u32> {
        self.movies
            .iter()
            .map(|m| m.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    pub fn get(&self, id: u32) -> Option<&MovieRecord> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut MovieRecord> {
        self.movies.iter_mut().find(|m| m.id == id)
    }

    pub fn contains_external_id(&self, normalized: &str) -> bool {
        self.movies.iter().any(|m| m.matches_external_id(normalized))
    }

    /// Remove the record with the given id, preserving the order of the rest.
    pub fn remove(&mut self, id: u32) -> Option<MovieRecord> {
        let index = self.movies.iter().position(|m| m.id == id)?;
        Some(self.movies.remove(index))
    }

    pub fn push(&mut self, movie: MovieRecord) {
        self.movies.push(movie);
    }
}

/// A stateless slice of the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub movies: Vec<MovieRecord>,
    pub total: usize,
    pub offset: usize,
}

/// Deserializers that read the "N/A" placeholders older documents contain.
mod lenient {
    use serde::{Deserialize, Deserializer};

    use super::UNKNOWN;
    use crate::collection::MAX_USER_RATING;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    fn known(text: String) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN) {
            None
        } else {
            Some(text)
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(known))
    }

    pub fn year<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Number(n)) if n >= 0.0 && n.fract() == 0.0 => Some(n as u32),
            Some(NumberOrText::Number(_)) => None,
            Some(NumberOrText::Text(text)) => known(text).and_then(|t| {
                let digits: String = t.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().ok()
            }),
        })
    }

    pub fn rating<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Number(n)) => Some(n as f32),
            Some(NumberOrText::Text(text)) => known(text).and_then(|t| t.trim().parse().ok()),
        })
    }

    /// Ratings outside 0..=10 were never validated by older writers; they read as unrated.
    pub fn user_rating<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<NumberOrText>::deserialize(deserializer)? {
            None => None,
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(text)) => known(text).and_then(|t| t.trim().parse().ok()),
        };
        Ok(value
            .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(MAX_USER_RATING)).contains(n))
            .map(|n| n as u8))
    }
}
