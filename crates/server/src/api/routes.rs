use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{catalog, handlers, middleware::metrics_middleware, movies};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Collection
        .route("/movies", get(movies::list_movies).post(movies::add_movie))
        .route(
            "/movies/{id}",
            get(movies::get_movie).delete(movies::delete_movie),
        )
        .route("/movies/{id}/rating", put(movies::rate_movie))
        // Catalog
        .route("/catalog/search", get(catalog::search))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
