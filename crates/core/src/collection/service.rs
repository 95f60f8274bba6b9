//! Collection operations.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::store::{MovieStore, StoreError};
use super::types::{Collection, MoviePage, MovieRecord};
use super::CollectionError;
use crate::external_catalog::{
    normalize_external_id, CatalogSummary, ExternalCatalog, ExternalCatalogError,
};
use crate::metrics::{CATALOG_REQUEST_DURATION, COLLECTION_OPERATIONS, COLLECTION_SIZE};

/// Highest accepted user rating.
pub const MAX_USER_RATING: u8 = 10;

/// Collection service.
///
/// Every mutation loads the whole collection, changes it and saves it back
/// while holding `write_lock`. Catalog requests are never made while the
/// lock is held. Store calls run on the blocking thread pool.
pub struct CollectionService {
    store: Arc<dyn MovieStore>,
    catalog: Option<Arc<dyn ExternalCatalog>>,
    write_lock: Mutex<()>,
}

impl CollectionService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self {
            store,
            catalog: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Attach the catalog used by `search_catalog` and `add_movie`.
    pub fn with_catalog(mut self, catalog: Arc<dyn ExternalCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// The stored collection, in insertion order.
    pub async fn list_all(&self) -> Result<Collection, CollectionError> {
        let result = self.load().await;
        record_outcome("list", &result);
        result
    }

    /// A slice of the collection starting at `offset`.
    pub async fn list_page(&self, offset: usize, limit: usize) -> Result<MoviePage, CollectionError> {
        let collection = self.list_all().await?;
        let total = collection.len();
        let movies = collection
            .movies
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        Ok(MoviePage {
            movies,
            total,
            offset,
        })
    }

    pub async fn get_movie(&self, id: u32) -> Result<MovieRecord, CollectionError> {
        let result = self
            .load()
            .await
            .and_then(|c| c.get(id).cloned().ok_or(CollectionError::MovieNotFound(id)));
        record_outcome("get", &result);
        result
    }

    /// Search the catalog by title. Does not touch the store.
    pub async fn search_catalog(&self, title: &str) -> Result<Vec<CatalogSummary>, CollectionError> {
        let result = self.search_catalog_inner(title).await;
        record_outcome("search", &result);
        result
    }

    async fn search_catalog_inner(
        &self,
        title: &str,
    ) -> Result<Vec<CatalogSummary>, CollectionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CollectionError::InvalidQuery);
        }

        let catalog = self.catalog()?;
        let results = timed("search", catalog.search_by_title(title)).await?;
        debug!("Catalog search '{}' returned {} results", title, results.len());
        Ok(results)
    }

    /// Add a movie by catalog id, fetching its details from the catalog.
    pub async fn add_movie(&self, external_id: &str) -> Result<MovieRecord, CollectionError> {
        let result = self.add_movie_inner(external_id).await;
        record_outcome("add", &result);
        result
    }

    async fn add_movie_inner(&self, external_id: &str) -> Result<MovieRecord, CollectionError> {
        let external_id = normalize_external_id(external_id)
            .ok_or_else(|| CollectionError::InvalidExternalId(external_id.to_string()))?;
        let catalog = self.catalog()?;

        // Fail fast on a known duplicate before going to the network.
        {
            let _guard = self.write_lock.lock().await;
            let collection = self.load().await?;
            if collection.contains_external_id(&external_id) {
                warn!("Rejected duplicate add of {}", external_id);
                return Err(CollectionError::DuplicateMovie(external_id));
            }
        }

        let details = timed("fetch", catalog.fetch_by_id(&external_id))
            .await
            .map_err(|e| match e {
                ExternalCatalogError::NotFound(_) => {
                    CollectionError::CatalogNotFound(external_id.clone())
                }
                other => CollectionError::CatalogUnavailable(other),
            })?;

        // Another add may have won while the catalog request was in flight.
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;
        if collection.contains_external_id(&external_id) {
            warn!("Rejected duplicate add of {} after catalog fetch", external_id);
            return Err(CollectionError::DuplicateMovie(external_id));
        }

        let id = collection.next_id().ok_or_else(|| {
            warn!("Cannot add {}: no movie ids left", external_id);
            CollectionError::IdsExhausted
        })?;
        let movie = MovieRecord::from_catalog(id, external_id, details);
        collection.push(movie.clone());
        self.save(collection).await?;

        info!(
            "Added movie {} '{}' ({})",
            movie.id, movie.title, movie.external_id
        );
        Ok(movie)
    }

    /// Remove a movie by id, returning the removed record.
    pub async fn delete_movie(&self, id: u32) -> Result<MovieRecord, CollectionError> {
        let result = self.delete_movie_inner(id).await;
        record_outcome("delete", &result);
        result
    }

    async fn delete_movie_inner(&self, id: u32) -> Result<MovieRecord, CollectionError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;

        let removed = collection
            .remove(id)
            .ok_or(CollectionError::MovieNotFound(id))?;
        self.save(collection).await?;

        info!("Deleted movie {} '{}'", removed.id, removed.title);
        Ok(removed)
    }

    /// Set the user rating of a movie, returning the updated record.
    pub async fn rate_movie(&self, id: u32, rating: u8) -> Result<MovieRecord, CollectionError> {
        let result = self.rate_movie_inner(id, rating).await;
        record_outcome("rate", &result);
        result
    }

    async fn rate_movie_inner(&self, id: u32, rating: u8) -> Result<MovieRecord, CollectionError> {
        if rating > MAX_USER_RATING {
            return Err(CollectionError::InvalidRating {
                rating,
                max: MAX_USER_RATING,
            });
        }

        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await?;

        let movie = collection
            .get_mut(id)
            .ok_or(CollectionError::MovieNotFound(id))?;
        movie.user_rating = Some(rating);
        let updated = movie.clone();
        self.save(collection).await?;

        info!("Rated movie {} '{}': {}", updated.id, updated.title, rating);
        Ok(updated)
    }

    fn catalog(&self) -> Result<&Arc<dyn ExternalCatalog>, CollectionError> {
        self.catalog.as_ref().ok_or_else(|| {
            CollectionError::CatalogUnavailable(ExternalCatalogError::NotConfigured(
                "No movie catalog configured".to_string(),
            ))
        })
    }

    async fn load(&self) -> Result<Collection, CollectionError> {
        let store = Arc::clone(&self.store);
        let collection = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| CollectionError::StoreRead(StoreError::Interrupted(e)))??;
        COLLECTION_SIZE.set(collection.len() as i64);
        Ok(collection)
    }

    async fn save(&self, collection: Collection) -> Result<(), CollectionError> {
        let store = Arc::clone(&self.store);
        let size = collection.len() as i64;
        tokio::task::spawn_blocking(move || store.save(&collection))
            .await
            .map_err(|e| CollectionError::StoreWrite(StoreError::Interrupted(e)))??;
        COLLECTION_SIZE.set(size);
        Ok(())
    }
}

fn record_outcome<T>(operation: &str, result: &Result<T, CollectionError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    COLLECTION_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

async fn timed<T>(
    operation: &str,
    request: impl Future<Output = Result<T, ExternalCatalogError>>,
) -> Result<T, ExternalCatalogError> {
    let start = Instant::now();
    let result = request.await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    CATALOG_REQUEST_DURATION
        .with_label_values(&[operation, outcome])
        .observe(start.elapsed().as_secs_f64());
    result
}
