//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the store and catalog traits,
//! allowing the collection to be exercised without disk or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use watchlist_core::testing::{fixtures, MockExternalCatalog, MockStore};
//!
//! let store = Arc::new(MockStore::new());
//! let catalog = Arc::new(MockExternalCatalog::new());
//! catalog.add_record(fixtures::catalog_record("tt0111161", "The Shawshank Redemption", 1994)).await;
//!
//! let service = CollectionService::new(store).with_catalog(catalog);
//! ```

mod mock_external_catalog;
mod mock_store;

pub use mock_external_catalog::{MockExternalCatalog, RecordedCatalogQuery};
pub use mock_store::MockStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::collection::{Collection, MovieRecord};
    use crate::external_catalog::CatalogRecord;

    /// Create a catalog record with reasonable defaults.
    pub fn catalog_record(external_id: &str, title: &str, year: u32) -> CatalogRecord {
        CatalogRecord {
            external_id: external_id.to_string(),
            title: title.to_string(),
            year: Some(year),
            cover_url: Some(format!("https://img.example.com/{}.jpg", external_id)),
            rating: Some(8.0),
            plot_summary: Some(format!("A movie about {}.", title.to_lowercase())),
        }
    }

    /// Create a stored movie record.
    pub fn movie_record(id: u32, external_id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            external_id: external_id.to_string(),
            title: title.to_string(),
            year: Some(2000),
            cover_url: None,
            catalog_rating: Some(7.0),
            user_rating: None,
            plot_summary: None,
            added_at: None,
        }
    }

    /// Create a collection from `(id, external_id, title)` triples.
    pub fn collection(entries: &[(u32, &str, &str)]) -> Collection {
        Collection {
            movies: entries
                .iter()
                .map(|(id, external_id, title)| movie_record(*id, external_id, title))
                .collect(),
        }
    }
}
