use async_trait::async_trait;

use super::error::StorageError;

/// Location metadata returned for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLocation {
    /// The key the object was stored under.
    pub key: String,
    /// Stored size in bytes.
    pub size: u64,
}

/// Key-addressed object storage.
///
/// Keys are relative slash-separated paths chosen by the caller
/// (e.g. `uploads/0193b2c4-7d1e-7f00-b1a2-3c4d5e6f7a8b.png`).
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store bytes under the given key, replacing any previous object.
    async fn put(&self, key: &str, data: &[u8]) -> Result<StoredLocation, StorageError>;

    /// Retrieve all bytes for an object.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Get the size of an object in bytes.
    async fn size(&self, key: &str) -> Result<u64, StorageError>;
}
