//! The shared movie collection.
//!
//! A [`CollectionService`] owns the read-modify-write cycle over a
//! [`MovieStore`] and fetches new entries from an
//! [`ExternalCatalog`](crate::external_catalog::ExternalCatalog).

mod service;
mod store;
mod types;

pub use service::{CollectionService, MAX_USER_RATING};
pub use store::{to_document, JsonFileStore, MovieStore, StoreError};
pub use types::*;

use thiserror::Error;

use crate::external_catalog::ExternalCatalogError;

/// Errors returned by collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The collection document could not be written.
    #[error("Could not save the movie list: {0}")]
    StoreWrite(#[source] StoreError),

    /// The collection document could not be read.
    #[error("Could not read the movie list: {0}")]
    StoreRead(#[source] StoreError),

    /// The collection document exists but is malformed.
    #[error("The movie list is corrupt: {0}")]
    CorruptStore(#[source] StoreError),

    /// The catalog could not be reached or refused the request.
    #[error("Movie catalog unavailable: {0}")]
    CatalogUnavailable(#[source] ExternalCatalogError),

    /// The catalog does not know the requested id.
    #[error("Movie not found in catalog: {0}")]
    CatalogNotFound(String),

    /// A movie with this catalog id is already in the collection.
    #[error("Movie {0} is already in the list")]
    DuplicateMovie(String),

    /// No movie with this id in the collection.
    #[error("Movie not found: {0}")]
    MovieNotFound(u32),

    /// Every local id up to `u32::MAX` is taken.
    #[error("No movie ids left to assign")]
    IdsExhausted,

    /// The rating is outside 0..=`max`.
    #[error("Rating must be between 0 and {max}, got {rating}")]
    InvalidRating { rating: u8, max: u8 },

    /// The catalog id is not of the `tt` + digits form.
    #[error("Not a valid catalog id: {0:?}")]
    InvalidExternalId(String),

    /// The search title is blank.
    #[error("Search title cannot be empty")]
    InvalidQuery,
}

impl CollectionError {
    /// Stable snake_case tag for this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreWrite(_) => "store_write",
            Self::StoreRead(_) => "store_read",
            Self::CorruptStore(_) => "corrupt_store",
            Self::CatalogUnavailable(_) => "catalog_unavailable",
            Self::CatalogNotFound(_) => "catalog_not_found",
            Self::DuplicateMovie(_) => "duplicate_movie",
            Self::MovieNotFound(_) => "movie_not_found",
            Self::IdsExhausted => "ids_exhausted",
            Self::InvalidRating { .. } => "invalid_rating",
            Self::InvalidExternalId(_) => "invalid_external_id",
            Self::InvalidQuery => "invalid_query",
        }
    }

    /// Whether the failure came from bad caller input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::CatalogNotFound(_)
                | Self::DuplicateMovie(_)
                | Self::MovieNotFound(_)
                | Self::InvalidRating { .. }
                | Self::InvalidExternalId(_)
                | Self::InvalidQuery
        )
    }
}

impl From<StoreError> for CollectionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { .. } => Self::CorruptStore(err),
            StoreError::Read { .. } => Self::StoreRead(err),
            StoreError::Write { .. } | StoreError::Serialize(_) | StoreError::Interrupted(_) => {
                Self::StoreWrite(err)
            }
        }
    }
}

impl From<ExternalCatalogError> for CollectionError {
    fn from(err: ExternalCatalogError) -> Self {
        match err {
            ExternalCatalogError::NotFound(id) => Self::CatalogNotFound(id),
            other => Self::CatalogUnavailable(other),
        }
    }
}
