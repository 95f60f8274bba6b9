//! Whole-document persistence for the collection.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::types::Collection;

/// Errors raised by a [`MovieStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("Failed to read collection from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document exists but does not parse.
    #[error("Collection document at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be written.
    #[error("Failed to write collection to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The collection could not be serialized.
    #[error("Failed to serialize collection: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The blocking task running the store call did not finish.
    #[error("Store task did not complete: {0}")]
    Interrupted(#[source] tokio::task::JoinError),
}

/// Storage for the collection document.
///
/// Implementations load and save the whole collection at once and do no
/// locking of their own.
pub trait MovieStore: Send + Sync {
    /// Load the collection. A missing document is an empty collection.
    fn load(&self) -> Result<Collection, StoreError>;

    /// Replace the stored collection. Readers never see a partial document.
    fn save(&self, collection: &Collection) -> Result<(), StoreError>;
}

/// Serialize a collection the way it is written to disk (4-space indent).
pub fn to_document(collection: &Collection) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    collection
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// JSON file store.
///
/// Saves go to a temporary file next to the target, which is then renamed
/// over it.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl MovieStore for JsonFileStore {
    fn load(&self) -> Result<Collection, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No collection at {}, starting empty", self.path.display());
                return Ok(Collection::default());
            }
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Collection::default());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let document = to_document(collection)?;

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let mut temp_file = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        temp_file
            .write_all(&document)
            .map_err(|e| self.write_error(e))?;
        temp_file.flush().map_err(|e| self.write_error(e))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| self.write_error(e))?;

        temp_file
            .persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        debug!(
            "Saved {} movies to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}
