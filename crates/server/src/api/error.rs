//! Mapping of collection errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use watchlist_core::{CollectionError, ExternalCatalogError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// An error returned by an API handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    pub fn bad_request(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            kind,
        }
    }
}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        let status = match &err {
            CollectionError::MovieNotFound(_) | CollectionError::CatalogNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            CollectionError::DuplicateMovie(_) => StatusCode::CONFLICT,
            CollectionError::InvalidRating { .. }
            | CollectionError::InvalidExternalId(_)
            | CollectionError::InvalidQuery => StatusCode::BAD_REQUEST,
            CollectionError::CatalogUnavailable(ExternalCatalogError::NotConfigured(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CollectionError::CatalogUnavailable(_) => StatusCode::BAD_GATEWAY,
            CollectionError::CorruptStore(_)
            | CollectionError::StoreRead(_)
            | CollectionError::StoreWrite(_)
            | CollectionError::IdsExhausted => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        }

        Self {
            status,
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error,
                kind: self.kind.to_string(),
            }),
        )
            .into_response()
    }
}
