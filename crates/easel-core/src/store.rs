//! Opaque key-value blob storage.
//!
//! The editor core only ever needs "read the blob under this key" and
//! "replace the blob under this key". Backends live outside this crate
//! except for [`MemoryStore`], which tests and previews use.

use crate::error::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A key-value store of UTF-8 blobs.
///
/// Implementations must be usable behind a shared reference so that a
/// session and a second reader can hold the same store.
pub trait BlobStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the blob stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.blobs.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.blobs.write().remove(key);
        Ok(())
    }
}
