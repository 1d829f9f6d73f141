use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;

use crate::error::BlobError;
use crate::store::BlobStore;
use crate::types::{PublicUrl, StoredBlob};

/// In-memory blob store using `DashMap`. Suitable for development and testing.
pub struct MemoryBlobStore {
    blobs: DashMap<String, (StoredBlob, Bytes)>,
    urls: PublicUrl,
}

impl MemoryBlobStore {
    /// Create an empty store whose blobs are served under `public_base`.
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            blobs: DashMap::new(),
            urls: PublicUrl::new(public_base),
        }
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob, BlobError> {
        if !lostfound_core::is_safe_file_name(name) {
            return Err(BlobError::InvalidName(name.to_owned()));
        }
        let meta = StoredBlob {
            name: name.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes: data.len() as u64,
            created_at: Utc::now(),
        };
        self.blobs.insert(name.to_owned(), (meta.clone(), data));
        Ok(meta)
    }

    async fn get(&self, name: &str) -> Result<Option<(StoredBlob, Bytes)>, BlobError> {
        Ok(self.blobs.get(name).map(|e| e.value().clone()))
    }

    async fn delete(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.blobs.remove(name).is_some())
    }

    fn public_url(&self, name: &str) -> String {
        self.urls.url_for(name)
    }

    fn name_from_url(&self, url: &str) -> Option<String> {
        self.urls.name_for(url).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run_blob_conformance_tests;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryBlobStore::new("http://localhost:3001/uploads");
        run_blob_conformance_tests(&store).await.unwrap();
    }
}
