//! Collection API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use watchlist_core::{MovieRecord, MAX_USER_RATING};

use super::error::ApiError;
use crate::state::AppState;

/// Default page size for listing.
const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a client may request.
const MAX_PAGE_SIZE: usize = 100;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListMoviesParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct AddMovieBody {
    pub external_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieBody {
    pub rating: i64,
}

/// A movie as shown to clients, with display fallbacks filled in.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: u32,
    pub external_id: String,
    pub title: String,
    pub year: Option<u32>,
    pub cover_url: Option<String>,
    pub catalog_rating: Option<f32>,
    pub user_rating: Option<u8>,
    pub plot_summary: Option<String>,
    pub added_at: Option<DateTime<Utc>>,
    pub display: MovieDisplay,
}

#[derive(Debug, Serialize)]
pub struct MovieDisplay {
    pub year: String,
    pub catalog_rating: String,
    pub user_rating: String,
    pub plot_summary: String,
    /// Only set when the cover URL is renderable.
    pub cover_url: Option<String>,
}

impl From<MovieRecord> for MovieResponse {
    fn from(movie: MovieRecord) -> Self {
        let display = MovieDisplay {
            year: movie.display_year(),
            catalog_rating: movie.display_catalog_rating(),
            user_rating: movie.display_user_rating(),
            plot_summary: movie.display_plot_summary().to_string(),
            cover_url: movie.display_cover_url().map(str::to_string),
        };
        Self {
            id: movie.id,
            external_id: movie.external_id,
            title: movie.title,
            year: movie.year,
            cover_url: movie.cover_url,
            catalog_rating: movie.catalog_rating,
            user_rating: movie.user_rating,
            plot_summary: movie.plot_summary,
            added_at: movie.added_at,
            display,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListMoviesResponse {
    pub movies: Vec<MovieResponse>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies
///
/// List the collection, one page at a time.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListMoviesParams>,
) -> Result<Json<ListMoviesResponse>, ApiError> {
    let limit = params.limit.clamp(1, MAX_PAGE_SIZE);
    let page = state.collection().list_page(params.offset, limit).await?;

    Ok(Json(ListMoviesResponse {
        movies: page.movies.into_iter().map(MovieResponse::from).collect(),
        total: page.total,
        offset: page.offset,
        limit,
    }))
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.collection().get_movie(id).await?;
    Ok(Json(movie.into()))
}

/// POST /api/v1/movies
///
/// Add a movie by catalog id.
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddMovieBody>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let movie = state.collection().add_movie(&body.external_id).await?;
    Ok((StatusCode::CREATED, Json(movie.into())))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<MovieResponse>, ApiError> {
    let movie = state.collection().delete_movie(id).await?;
    Ok(Json(movie.into()))
}

/// PUT /api/v1/movies/{id}/rating
pub async fn rate_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<RateMovieBody>,
) -> Result<Json<MovieResponse>, ApiError> {
    let rating = u8::try_from(body.rating).map_err(|_| {
        ApiError::bad_request(
            "invalid_rating",
            format!(
                "Rating must be between 0 and {}, got {}",
                MAX_USER_RATING, body.rating
            ),
        )
    })?;

    let movie = state.collection().rate_movie(id, rating).await?;
    Ok(Json(movie.into()))
}
