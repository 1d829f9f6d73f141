use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use lostfound_blob::error::BlobError;
use lostfound_blob::store::BlobStore;
use lostfound_blob::types::{PublicUrl, StoredBlob};

use crate::config::S3BlobConfig;

/// Blob store backed by an S3 bucket.
pub struct S3BlobStore {
    config: S3BlobConfig,
    client: aws_sdk_s3::Client,
    urls: PublicUrl,
}

impl std::fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish_non_exhaustive()
    }
}

impl S3BlobStore {
    /// Create a new store, building an AWS SDK client from the environment
    /// credential chain.
    pub async fn new(config: S3BlobConfig) -> Self {
        let mut loader =
            aws_config::from_env().region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "using custom S3 endpoint");
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.endpoint_url.is_some() {
            // S3-compatible servers rarely support virtual-hosted buckets.
            s3_config = s3_config.force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(s3_config.build());
        Self::with_client(config, client)
    }

    /// Create a store with a pre-built client (for testing).
    pub fn with_client(config: S3BlobConfig, client: aws_sdk_s3::Client) -> Self {
        let urls = PublicUrl::new(config.resolved_public_base());
        Self {
            config,
            client,
            urls,
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        match self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(BlobError::Storage(service_err.to_string()))
                }
            }
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob, BlobError> {
        if !lostfound_core::is_safe_file_name(name) {
            return Err(BlobError::InvalidName(name.to_owned()));
        }
        let key = self.config.key_for(name);
        let size_bytes = data.len() as u64;
        debug!(bucket = %self.config.bucket, key = %key, size = size_bytes, "uploading object to S3");

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                error!(error = %err_str, "S3 put_object failed");
                BlobError::Storage(err_str)
            })?;

        info!(bucket = %self.config.bucket, key = %key, "S3 object uploaded");
        Ok(StoredBlob {
            name: name.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes,
            created_at: Utc::now(),
        })
    }

    async fn get(&self, name: &str) -> Result<Option<(StoredBlob, Bytes)>, BlobError> {
        let key = self.config.key_for(name);
        let result = match self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(BlobError::Storage(service_err.to_string()));
            }
        };

        let content_type = result
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let created_at = result
            .last_modified()
            .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
            .unwrap_or_else(Utc::now);

        let data = result
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Storage(format!("failed to read S3 body: {e}")))?
            .into_bytes();

        Ok(Some((
            StoredBlob {
                name: name.to_owned(),
                content_type,
                size_bytes: data.len() as u64,
                created_at,
            },
            data,
        )))
    }

    async fn delete(&self, name: &str) -> Result<bool, BlobError> {
        let key = self.config.key_for(name);
        // S3 deletes are idempotent, so existence has to be checked first.
        if !self.exists(&key).await? {
            return Ok(false);
        }
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                error!(error = %err_str, "S3 delete_object failed");
                BlobError::Storage(err_str)
            })?;
        info!(bucket = %self.config.bucket, key = %key, "S3 object deleted");
        Ok(true)
    }

    fn public_url(&self, name: &str) -> String {
        self.urls.url_for(name)
    }

    fn name_from_url(&self, url: &str) -> Option<String> {
        self.urls.name_for(url).map(str::to_owned)
    }
}
