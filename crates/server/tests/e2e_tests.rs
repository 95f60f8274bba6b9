//! End-to-end tests for the watchlist HTTP API.
//!
//! These drive the full router in-process with a file-backed collection and
//! a mock catalog.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use watchlist_core::ExternalCatalogError;

use common::{TestConfig, TestFixture};

// =============================================================================
// Health and config
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", json!("ok"));
    assert_json_path!(response.body, "catalog_configured", json!(true));
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["catalog"]["backend"], "omdb");
    assert_eq!(response.body["catalog"]["omdb"]["api_key_configured"], true);
    assert!(response.body["catalog"]["omdb"].get("api_key").is_none());
    assert!(!response.body.to_string().contains("test-key"));
}

// =============================================================================
// Collection lifecycle
// =============================================================================

#[tokio::test]
async fn test_search_add_rate_delete() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/catalog/search?title=shawshank").await;
    assert_status!(response, StatusCode::OK);
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["external_id"], "tt0111161");

    let response = fixture
        .post("/api/v1/movies", json!({ "external_id": "tt0111161" }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_json_path!(response.body, "id", json!(1));
    assert_json_path!(response.body, "title", json!("The Shawshank Redemption"));
    assert_json_path!(response.body, "user_rating", json!(null));
    assert_eq!(response.body["display"]["user_rating"], "Not rated");

    let response = fixture
        .put("/api/v1/movies/1/rating", json!({ "rating": 9 }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "user_rating", json!(9));
    assert_eq!(response.body["display"]["user_rating"], "9/10");

    let response = fixture.get("/api/v1/movies/1").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "user_rating", json!(9));

    let response = fixture.delete("/api/v1/movies/1").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "external_id", json!("tt0111161"));

    let response = fixture.delete("/api/v1/movies/1").await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "kind", json!("movie_not_found"));

    let response = fixture.get("/api/v1/movies").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "total", json!(0));
}

#[tokio::test]
async fn test_list_pagination() {
    let fixture = TestFixture::new().await;
    for id in ["tt0111161", "tt0068646", "tt0071562"] {
        let response = fixture
            .post("/api/v1/movies", json!({ "external_id": id }))
            .await;
        assert_status!(response, StatusCode::CREATED);
    }

    let response = fixture.get("/api/v1/movies?offset=1&limit=1").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "total", json!(3));
    assert_json_path!(response.body, "offset", json!(1));
    assert_json_path!(response.body, "limit", json!(1));
    let movies = response.body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["id"], 2);

    let response = fixture.get("/api/v1/movies").await;
    let movies = response.body["movies"].as_array().unwrap();
    let ids: Vec<u64> = movies.iter().map(|m| m["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_duplicate_add_is_conflict() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/v1/movies", json!({ "external_id": "tt0068646" }))
        .await;
    let before = fixture.document();

    let response = fixture
        .post("/api/v1/movies", json!({ "external_id": "0068646" }))
        .await;
    assert_status!(response, StatusCode::CONFLICT);
    assert_json_path!(response.body, "kind", json!("duplicate_movie"));
    assert_eq!(fixture.document(), before);
}

#[tokio::test]
async fn test_unknown_catalog_id_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/v1/movies", json!({ "external_id": "tt9999999" }))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "kind", json!("catalog_not_found"));
    assert!(fixture.document().is_none());
}

#[tokio::test]
async fn test_invalid_external_id_is_bad_request() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/v1/movies", json!({ "external_id": "godfather" }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "kind", json!("invalid_external_id"));
    assert_eq!(fixture.catalog.query_count().await, 0);
}

#[tokio::test]
async fn test_invalid_ratings_are_bad_request() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/v1/movies", json!({ "external_id": "tt0111161" }))
        .await;

    for rating in [11, 300, -1] {
        let response = fixture
            .put("/api/v1/movies/1/rating", json!({ "rating": rating }))
            .await;
        assert_status!(response, StatusCode::BAD_REQUEST);
        assert_json_path!(response.body, "kind", json!("invalid_rating"));
    }

    let response = fixture.get("/api/v1/movies/1").await;
    assert_json_path!(response.body, "user_rating", json!(null));
}

#[tokio::test]
async fn test_rate_missing_movie_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .put("/api/v1/movies/5/rating", json!({ "rating": 5 }))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "kind", json!("movie_not_found"));
}

#[tokio::test]
async fn test_blank_search_is_bad_request() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/catalog/search?title=%20%20").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "kind", json!("invalid_query"));

    let response = fixture.get("/api/v1/catalog/search").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_failure_is_bad_gateway() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_next_error(ExternalCatalogError::RateLimitExceeded)
        .await;

    let response = fixture.get("/api/v1/catalog/search?title=godfather").await;
    assert_status!(response, StatusCode::BAD_GATEWAY);
    assert_json_path!(response.body, "kind", json!("catalog_unavailable"));
}

#[tokio::test]
async fn test_missing_catalog_is_service_unavailable() {
    let fixture = TestFixture::with_config(TestConfig::without_catalog()).await;

    let response = fixture.get("/api/v1/health").await;
    assert_json_path!(response.body, "catalog_configured", json!(false));

    let response = fixture.get("/api/v1/catalog/search?title=godfather").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);

    let response = fixture
        .post("/api/v1/movies", json!({ "external_id": "tt0111161" }))
        .await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);

    // Listing still works
    let response = fixture.get("/api/v1/movies").await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_corrupt_store_is_server_error() {
    let fixture = TestFixture::new().await;
    std::fs::write(&fixture.store_path, "not json at all").unwrap();

    let response = fixture.get("/api/v1/movies").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_json_path!(response.body, "kind", json!("corrupt_store"));
    assert_eq!(fixture.document().as_deref(), Some("not json at all"));
}

// =============================================================================
// Metrics
// =============================================================================

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/movies/3").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("watchlist_http_requests_total"));
    assert!(body.contains("/api/v1/movies/{id}"));
    assert!(body.contains("watchlist_collection_operations_total"));
}
