//! Blob storage port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::error::StorageError;

/// A stored object and where it can be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Storage key.
    pub key: String,
    /// Public URL.
    pub url: String,
}

/// Object storage used for employee images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str)
    -> Result<StoredBlob, StorageError>;

    /// Deletes the object at `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// [`BlobStore`] kept in process memory.
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    base_url: String,
    objects: Arc<RwLock<HashMap<String, (Bytes, String)>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store serving URLs under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::default(),
        }
    }

    /// Returns the bytes and content type stored at `key`.
    pub async fn get(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(StoredBlob {
            key: key.to_string(),
            url: format!("{}/{key}", self.base_url.trim_end_matches('/')),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}
