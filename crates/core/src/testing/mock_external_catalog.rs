//! Mock external catalog for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::external_catalog::{
    CatalogRecord, CatalogSummary, ExternalCatalog, ExternalCatalogError,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCatalogQuery {
    SearchByTitle { title: String },
    FetchById { external_id: String },
}

/// Mock implementation of the ExternalCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable catalog records
/// - Track queries for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use watchlist_core::testing::{MockExternalCatalog, fixtures};
///
/// let catalog = MockExternalCatalog::new();
/// catalog.add_record(fixtures::catalog_record("tt0133093", "The Matrix", 1999)).await;
///
/// let results = catalog.search_by_title("matrix").await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockExternalCatalog {
    /// Records in insertion order, which is also the search ranking.
    records: Arc<RwLock<Vec<CatalogRecord>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
    /// Artificial latency for `fetch_by_id`.
    fetch_delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockExternalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExternalCatalog {
    /// Create a new empty mock external catalog.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fetch_delay: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Records Configuration
    // =========================================================================

    /// Add a record, replacing any with the same external id.
    pub async fn add_record(&self, record: CatalogRecord) {
        let mut records = self.records.write().await;
        records.retain(|r| r.external_id != record.external_id);
        records.push(record);
    }

    /// Clear all records.
    pub async fn clear_records(&self) {
        self.records.write().await.clear();
    }

    /// Delay every `fetch_by_id` by the given duration.
    pub async fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.write().await = Some(delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    async fn search_by_title(
        &self,
        title: &str,
    ) -> Result<Vec<CatalogSummary>, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::SearchByTitle {
            title: title.to_string(),
        })
        .await;

        let query_lower = title.to_lowercase();
        let results = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&query_lower))
            .map(|r| CatalogSummary {
                external_id: r.external_id.clone(),
                title: r.title.clone(),
                year: r.year,
                cover_url: r.cover_url.clone(),
            })
            .collect();

        Ok(results)
    }

    async fn fetch_by_id(&self, external_id: &str) -> Result<CatalogRecord, ExternalCatalogError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedCatalogQuery::FetchById {
            external_id: external_id.to_string(),
        })
        .await;

        let delay = *self.fetch_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.records
            .read()
            .await
            .iter()
            .find(|r| r.external_id == external_id)
            .cloned()
            .ok_or_else(|| ExternalCatalogError::NotFound(format!("Title {} not found", external_id)))
    }
}
