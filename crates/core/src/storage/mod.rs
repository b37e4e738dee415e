//! Blob storage for employee images using Apache OpenDAL.
//!
//! Supported backends:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              BlobStore (port)                  │
//! │   put(key, bytes, content_type) │ delete(key)  │
//! ├───────────────────────┬───────────────────────┤
//! │   OpenDalBlobStore    │   InMemoryBlobStore   │
//! └───────────────────────┴───────────────────────┘
//! ```

mod blob;
mod config;
mod error;
mod service;

pub use blob::{BlobStore, InMemoryBlobStore, StoredBlob};
pub use config::{StorageConfig, StorageProvider, UploadPolicy};
pub use error::StorageError;
pub use service::{OpenDalBlobStore, image_storage_key, sanitize_filename};
