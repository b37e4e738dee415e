//! OpenDAL-backed blob store.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use kaizen_shared::types::EmployeeId;
use opendal::{Operator, services};
use tracing::{debug, info};

use super::blob::{BlobStore, StoredBlob};
use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Blob store for any backend OpenDAL supports.
pub struct OpenDalBlobStore {
    operator: Operator,
    public_base_url: String,
    provider_name: &'static str,
}

impl std::fmt::Debug for OpenDalBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenDalBlobStore")
            .field("provider", &self.provider_name)
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl OpenDalBlobStore {
    /// Create a new blob store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        info!(provider = config.provider.name(), "blob store ready");
        Ok(Self {
            operator,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            provider_name: config.provider.name(),
        })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder)?.finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);
                Operator::new(builder)?.finish()
            }
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root))?.finish()
            }
        };
        Ok(operator)
    }

    /// Public URL of the object at `key`.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    /// Get the storage provider name.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.provider_name
    }
}

#[async_trait]
impl BlobStore for OpenDalBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredBlob, StorageError> {
        let size = bytes.len();
        self.operator
            .write_with(key, bytes)
            .content_type(content_type)
            .await?;
        debug!(key, size, content_type, "object stored");
        Ok(StoredBlob {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        debug!(key, "object deleted");
        Ok(())
    }
}

/// Storage key for an employee image.
///
/// Format: `employees/{employee_id}/{unix_millis}-{sanitized_filename}`
#[must_use]
pub fn image_storage_key(
    employee_id: &EmployeeId,
    filename: &str,
    uploaded_at: DateTime<Utc>,
) -> String {
    let name = if filename.trim().is_empty() {
        "image".to_string()
    } else {
        sanitize_filename(filename.trim())
    };
    format!(
        "employees/{}/{}-{name}",
        sanitize_filename(employee_id.as_str()),
        uploaded_at.timestamp_millis()
    )
}

/// Sanitize filename for storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores survive;
/// anything else, spaces included, becomes `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("profile.png"), "profile.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("日本語.png"), "___.png");
    }

    #[test]
    fn test_image_storage_key() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let key = image_storage_key(&"G1234567X".into(), "site photo.png", at);
        assert_eq!(key, "employees/G1234567X/1700000000123-site_photo.png");
    }

    #[test]
    fn test_image_storage_key_without_name() {
        let at = Utc.timestamp_millis_opt(5).unwrap();
        assert_eq!(
            image_storage_key(&"G1".into(), "  ", at),
            "employees/G1/5-image"
        );
    }

    #[tokio::test]
    async fn test_local_fs_put_and_delete() {
        let root = std::env::temp_dir().join(format!(
            "kaizen-blob-test-{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let config = StorageConfig::new(
            StorageProvider::LocalFs { root: root.clone() },
            "http://localhost:8080/files/",
        );
        let store = OpenDalBlobStore::from_config(&config).unwrap();
        assert_eq!(store.provider_name(), "local");

        let stored = store
            .put("employees/G1/1-a.png", Bytes::from_static(b"\x89PNG"), "image/png")
            .await
            .unwrap();
        assert_eq!(stored.url, "http://localhost:8080/files/employees/G1/1-a.png");
        assert!(root.join("employees/G1/1-a.png").exists());

        store.delete("employees/G1/1-a.png").await.unwrap();
        assert!(!root.join("employees/G1/1-a.png").exists());

        let _ = std::fs::remove_dir_all(root);
    }
}
