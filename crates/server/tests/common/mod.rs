//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a file-backed collection and a mock catalog, enabling E2E testing
//! without network access.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use watchlist_core::{
    testing::MockExternalCatalog, CatalogBackend, CatalogConfig, CollectionService, Config,
    ExternalCatalog, JsonFileStore, MovieStore, OmdbConfig, ServerConfig, StoreConfig,
};

/// Re-export fixtures for test convenience
pub use watchlist_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_movie() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/movies", json!({
///         "external_id": "tt0111161"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure search and fetch responses
    pub catalog: Arc<MockExternalCatalog>,
    /// Path of the collection file
    pub store_path: PathBuf,
    /// Temporary directory holding the collection file
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with a catalog.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = temp_dir.path().join("movies.json");

        let catalog = Arc::new(MockExternalCatalog::new());
        for (external_id, title, year) in [
            ("tt0111161", "The Shawshank Redemption", 1994),
            ("tt0068646", "The Godfather", 1972),
            ("tt0071562", "The Godfather Part II", 1974),
        ] {
            catalog
                .add_record(fixtures::catalog_record(external_id, title, year))
                .await;
        }

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            store: StoreConfig {
                path: store_path.clone(),
            },
            catalog: if test_config.without_catalog {
                None
            } else {
                Some(CatalogConfig {
                    backend: CatalogBackend::Omdb,
                    omdb: Some(OmdbConfig {
                        api_key: "test-key".to_string(),
                        base_url: None,
                        timeout_secs: 10,
                        search_limit: 10,
                    }),
                })
            },
        };

        let store: Arc<dyn MovieStore> = Arc::new(JsonFileStore::new(&store_path));
        let mut service = CollectionService::new(store);
        if !test_config.without_catalog {
            service = service.with_catalog(Arc::clone(&catalog) as Arc<dyn ExternalCatalog>);
        }

        let state = Arc::new(watchlist_server::state::AppState::new(
            config,
            Arc::new(service),
        ));
        let router = watchlist_server::api::create_router(state);

        Self {
            router,
            catalog,
            store_path,
            temp_dir,
        }
    }

    /// Contents of the collection file, if it exists.
    pub fn document(&self) -> Option<String> {
        std::fs::read_to_string(&self.store_path).ok()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Run without a catalog, as when `[catalog]` is absent
    pub without_catalog: bool,
}

impl TestConfig {
    /// Create config with no catalog configured.
    pub fn without_catalog() -> Self {
        Self {
            without_catalog: true,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
