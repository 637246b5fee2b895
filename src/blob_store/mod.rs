mod local;

pub use local::LocalStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Blob not found: {0}")]
    NotFound(String),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Abstraction over blob storage for uploaded file content.
///
/// Keys are server-generated storage keys, never client-supplied names.
/// The store owns the flat-layout contract: a key names exactly one entry
/// in a flat namespace, and anything path-shaped is rejected with
/// `InvalidKey` rather than resolved.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobStoreError>;
    async fn get(&self, key: &str) -> Result<Bytes, BlobStoreError>;
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;
}
