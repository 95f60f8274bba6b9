//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Collection operations (add, delete, rate, list) by outcome
//! - External catalog requests

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Collection Metrics
// =============================================================================

/// Collection operations total by operation and result.
pub static COLLECTION_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "watchlist_collection_operations_total",
            "Total collection operations",
        ),
        &["operation", "result"], // result: "ok" or the error kind
    )
    .unwrap()
});

/// Number of movies in the collection as of the last load or save.
pub static COLLECTION_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "watchlist_collection_size",
        "Number of movies in the collection",
    )
    .unwrap()
});

// =============================================================================
// External Catalog Metrics
// =============================================================================

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "watchlist_catalog_request_duration_seconds",
            "Duration of external catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation", "result"], // operation: "search", "fetch"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(COLLECTION_OPERATIONS.clone()),
        Box::new(COLLECTION_SIZE.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
    ]
}
