use std::sync::Arc;

use lostfound_blob::{BlobStore, MemoryBlobStore};
use lostfound_blob_fs::FsBlobStore;
#[cfg(feature = "s3")]
use lostfound_blob_s3::{S3BlobConfig, S3BlobStore};

use crate::config::{ServerConfig, StorageConfig};
use crate::error::ServerError;

/// Route under which the memory and filesystem backends serve uploads.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Create the object store for uploaded images.
///
/// `server` supplies the default public base URL for backends that are
/// served by this process.
#[allow(clippy::unused_async)]
pub async fn create_blob_store(
    config: &StorageConfig,
    server: &ServerConfig,
) -> Result<Arc<dyn BlobStore>, ServerError> {
    let local_base = || {
        config
            .public_base_url
            .clone()
            .unwrap_or_else(|| format!("{}{UPLOADS_ROUTE}", server.base_url()))
    };

    let store: Arc<dyn BlobStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryBlobStore::new(local_base())),
        "fs" => {
            let store = FsBlobStore::new(&config.dir, local_base())
                .await
                .map_err(|e| ServerError::Config(format!("fs storage: {e}")))?;
            Arc::new(store)
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let bucket = config.bucket.as_deref().ok_or_else(|| {
                ServerError::Config("s3 storage backend requires [storage] bucket".into())
            })?;

            let mut s3_config = S3BlobConfig::new(bucket);
            if let Some(region) = &config.region {
                s3_config = s3_config.with_region(region);
            }
            if let Some(endpoint) = &config.endpoint_url {
                s3_config = s3_config.with_endpoint_url(endpoint);
            }
            if let Some(prefix) = &config.prefix {
                s3_config = s3_config.with_prefix(prefix);
            }
            if let Some(base) = &config.public_base_url {
                s3_config = s3_config.with_public_base_url(base);
            }

            Arc::new(S3BlobStore::new(s3_config).await)
        }
        other => {
            return Err(ServerError::Config(format!(
                "unsupported storage backend: {other}"
            )));
        }
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_urls_default_to_this_server() {
        let server = ServerConfig {
            port: 4000,
            ..ServerConfig::default()
        };
        let store = create_blob_store(&StorageConfig::default(), &server)
            .await
            .unwrap();
        assert_eq!(
            store.public_url("1-a.png"),
            "http://localhost:4000/uploads/1-a.png"
        );
    }

    #[tokio::test]
    async fn fs_backend_creates_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("images");
        let config = StorageConfig {
            backend: "fs".into(),
            dir: root.display().to_string(),
            public_base_url: Some("https://img.example.com/".into()),
            ..StorageConfig::default()
        };
        let store = create_blob_store(&config, &ServerConfig::default())
            .await
            .unwrap();
        assert!(root.is_dir());
        assert_eq!(store.public_url("x.png"), "https://img.example.com/x.png");
    }

    #[tokio::test]
    async fn unknown_backend_is_a_config_error() {
        let config = StorageConfig {
            backend: "ftp".into(),
            ..StorageConfig::default()
        };
        let err = create_blob_store(&config, &ServerConfig::default())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("unsupported storage backend: ftp"));
    }
}
