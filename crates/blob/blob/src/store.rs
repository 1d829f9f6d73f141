use async_trait::async_trait;
use bytes::Bytes;

use crate::error::BlobError;
use crate::types::StoredBlob;

/// Pluggable object storage backend for uploaded images.
///
/// Implementors provide the actual storage mechanism (memory, a local
/// directory, S3). Names are chosen by the caller and are unique.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `name` and return its metadata.
    async fn put(&self, name: &str, content_type: &str, data: Bytes)
    -> Result<StoredBlob, BlobError>;

    /// Retrieve a blob, returning both metadata and content.
    ///
    /// Returns `None` if the blob does not exist.
    async fn get(&self, name: &str) -> Result<Option<(StoredBlob, Bytes)>, BlobError>;

    /// Delete a blob. Returns `true` if the blob existed.
    async fn delete(&self, name: &str) -> Result<bool, BlobError>;

    /// The publicly resolvable URL of `name`.
    fn public_url(&self, name: &str) -> String;

    /// The blob name behind a URL this store issued, if it did.
    fn name_from_url(&self, url: &str) -> Option<String>;
}
