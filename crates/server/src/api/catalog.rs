//! Catalog search handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use watchlist_core::CatalogSummary;

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CatalogSummary>,
}

/// GET /api/v1/catalog/search?title=...
///
/// Search the external catalog by title. Does not modify the collection.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state.collection().search_catalog(&params.title).await?;
    Ok(Json(SearchResponse {
        query: params.title,
        results,
    }))
}
