use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use lostfound_blob::error::BlobError;
use lostfound_blob::store::BlobStore;
use lostfound_blob::types::{PublicUrl, StoredBlob};
use lostfound_core::{content_type_for, is_safe_file_name};

/// Blob store that keeps every upload as a file in one directory.
///
/// The media type is not recorded; it is recovered from the file extension.
pub struct FsBlobStore {
    root: PathBuf,
    urls: PublicUrl,
}

impl FsBlobStore {
    /// Use `root` (created if missing) and serve blobs under `public_base`.
    pub async fn new(
        root: impl Into<PathBuf>,
        public_base: impl Into<String>,
    ) -> Result<Self, BlobError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?;
        Ok(Self {
            root,
            urls: PublicUrl::new(public_base),
        })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, BlobError> {
        if is_safe_file_name(name) {
            Ok(self.root.join(name))
        } else {
            Err(BlobError::InvalidName(name.to_owned()))
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob, BlobError> {
        let path = self.path_for(name)?;
        let size_bytes = data.len() as u64;
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| BlobError::Storage(e.to_string()))?;
        debug!(path = %path.display(), size = size_bytes, "blob written");

        Ok(StoredBlob {
            name: name.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes,
            created_at: Utc::now(),
        })
    }

    async fn get(&self, name: &str) -> Result<Option<(StoredBlob, Bytes)>, BlobError> {
        let Ok(path) = self.path_for(name) else {
            return Ok(None);
        };
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BlobError::Storage(e.to_string())),
        };
        let created_at = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

        let meta = StoredBlob {
            name: name.to_owned(),
            content_type: content_type_for(name).to_owned(),
            size_bytes: data.len() as u64,
            created_at,
        };
        Ok(Some((meta, Bytes::from(data))))
    }

    async fn delete(&self, name: &str) -> Result<bool, BlobError> {
        let Ok(path) = self.path_for(name) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BlobError::Storage(e.to_string())),
        }
    }

    fn public_url(&self, name: &str) -> String {
        self.urls.url_for(name)
    }

    fn name_from_url(&self, url: &str) -> Option<String> {
        self.urls.name_for(url).map(str::to_owned)
    }
}
