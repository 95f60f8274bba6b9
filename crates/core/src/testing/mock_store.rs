//! In-memory store for testing.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::collection::{to_document, Collection, MovieStore, StoreError};

/// Mock implementation of the MovieStore trait.
///
/// Keeps the serialized document in memory so tests can compare it byte for
/// byte, plant corrupt contents, and make saves fail.
#[derive(Debug, Default)]
pub struct MockStore {
    /// Serialized document; `None` means nothing has been written yet.
    document: Mutex<Option<String>>,
    /// If set, every save fails with a write error.
    fail_writes: AtomicBool,
    /// Number of successful saves.
    saves: AtomicUsize,
}

impl MockStore {
    /// Create a new store with no document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given collection.
    pub fn with_collection(collection: &Collection) -> Self {
        let store = Self::new();
        let document = to_document(collection).expect("collection serializes");
        *store.lock() = Some(String::from_utf8_lossy(&document).into_owned());
        store
    }

    /// Replace the stored document with raw text.
    pub fn set_raw(&self, contents: &str) {
        *self.lock() = Some(contents.to_string());
    }

    /// The stored document, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MovieStore for MockStore {
    fn load(&self) -> Result<Collection, StoreError> {
        match self.lock().as_deref() {
            None => Ok(Collection::default()),
            Some(contents) if contents.trim().is_empty() => Ok(Collection::default()),
            Some(contents) => serde_json::from_str(contents).map_err(|e| StoreError::Corrupt {
                path: PathBuf::from("memory"),
                source: e,
            }),
        }
    }

    fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                path: PathBuf::from("memory"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
            });
        }

        let document = to_document(collection)?;
        *self.lock() = Some(String::from_utf8_lossy(&document).into_owned());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
