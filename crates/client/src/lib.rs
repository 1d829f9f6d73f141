//! Lost & Found HTTP Client
//!
//! A native Rust client for the Lost & Found REST API, plus
//! [`RemoteItemStore`], which exposes a server as an
//! [`ItemStore`](lostfound_store::ItemStore).
//!
//! # Quick Start
//!
//! ```no_run
//! use lostfound_client::LostFoundClient;
//! use lostfound_core::ItemQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lostfound_client::Error> {
//!     let client = LostFoundClient::new("http://localhost:3001");
//!
//!     let health = client.health().await?;
//!     println!("Server is up ({})", health.environment);
//!
//!     let page = client.list_items(&ItemQuery::default().with_search("wallet")).await?;
//!     for item in page.items {
//!         println!("{} [{}] {}", item.id, item.item_type, item.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use lostfound_client::LostFoundClientBuilder;
//! use lostfound_core::UploadPolicy;
//! use std::time::Duration;
//!
//! let client = LostFoundClientBuilder::new("http://localhost:3001/api")
//!     .timeout(Duration::from_secs(10))
//!     .upload_policy(UploadPolicy::new(2 * 1024 * 1024))
//!     .build()
//!     .unwrap();
//! ```

mod error;
mod remote;

pub use error::Error;
pub use remote::RemoteItemStore;

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lostfound_core::{
    ApiResponse, Item, ItemDraft, ItemPage, ItemPatch, ItemQuery, Pagination, UploadPolicy,
    UploadedFile, content_type_for,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Multipart field the server reads the image from.
const UPLOAD_FIELD: &str = "image";

/// Body of a successful health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub timestamp: DateTime<Utc>,
    pub environment: String,
}

/// HTTP client for the Lost & Found API.
#[derive(Debug, Clone)]
pub struct LostFoundClient {
    client: Client,
    base_url: String,
    policy: UploadPolicy,
}

/// Builder for configuring a [`LostFoundClient`].
#[derive(Debug)]
pub struct LostFoundClientBuilder {
    base_url: String,
    timeout: Duration,
    policy: UploadPolicy,
    client: Option<Client>,
}

impl LostFoundClientBuilder {
    /// Create a new builder with the given base URL.
    ///
    /// Both the server root (`http://host:3001`) and the `/api` mount
    /// (`http://host:3001/api`) are accepted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            policy: UploadPolicy::default(),
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the limits checked before any upload is sent.
    #[must_use]
    pub fn upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a custom reqwest Client.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LostFoundClient, Error> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "base URL must start with http:// or https://: {}",
                self.base_url
            )));
        }

        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(LostFoundClient {
            client,
            base_url: self.base_url,
            policy: self.policy,
        })
    }
}

impl LostFoundClient {
    /// Create a new client with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is not an `http(s)` URL; use
    /// [`builder`](Self::builder) to handle that as an error.
    pub fn new(base_url: impl Into<String>) -> Self {
        LostFoundClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> LostFoundClientBuilder {
        LostFoundClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The limits checked before uploading.
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.policy
    }

    fn item_url(&self, id: &str) -> String {
        format!(
            "{}/items/{}",
            self.base_url,
            utf8_percent_encode(id, NON_ALPHANUMERIC)
        )
    }

    /// The health check lives at the server root even when the client
    /// talks to the `/api` mount.
    fn health_url(&self) -> String {
        let root = self.base_url.strip_suffix("/api").unwrap_or(&self.base_url);
        format!("{root}/health")
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check that the server is up.
    pub async fn health(&self) -> Result<HealthInfo, Error> {
        let response = self
            .client
            .get(self.health_url())
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        require_data(read_envelope(response).await?)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Fetch one page of items.
    pub async fn list_items(&self, query: &ItemQuery) -> Result<ItemPage, Error> {
        let url = format!("{}/items", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let envelope: ApiResponse<Vec<Item>> = read_envelope(response).await?;
        let pagination = envelope.pagination;
        let items = require_data(envelope)?;
        let pagination = pagination.unwrap_or(Pagination {
            page: query.page,
            limit: query.limit,
            total: items.len() as u64,
        });
        Ok(ItemPage { items, pagination })
    }

    /// Fetch one item. A missing item is an [`Error::Api`] with status 404.
    pub async fn get_item(&self, id: &str) -> Result<Item, Error> {
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        require_data(read_envelope(response).await?)
    }

    /// Report a new item. The server assigns `id` and `date_reported`.
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item, Error> {
        let url = format!("{}/items", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let item: Item = require_data(read_envelope(response).await?)?;
        debug!(id = %item.id, "item created");
        Ok(item)
    }

    /// Change the fields present in `patch`.
    pub async fn update_item(&self, id: &str, patch: &ItemPatch) -> Result<Item, Error> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        require_data(read_envelope(response).await?)
    }

    /// Delete an item.
    pub async fn delete_item(&self, id: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Upload an image.
    ///
    /// The upload policy is checked first; a rejected file is reported as
    /// [`Error::UploadRejected`] without touching the network.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<UploadedFile, Error> {
        let data = data.into();
        self.policy.check(data.len() as u64, content_type)?;

        let part = Part::stream(reqwest::Body::from(data))
            .file_name(file_name.to_owned())
            .mime_str(content_type)
            .map_err(|e| Error::Configuration(format!("invalid content type: {e}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let url = format!("{}/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let file: UploadedFile = require_data(read_envelope(response).await?)?;
        debug!(name = %file.file_name, size = file.file_size, "image uploaded");
        Ok(file)
    }

    /// Upload an image from disk, deriving the media type from the file
    /// extension. Oversized files are rejected before they are read.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<UploadedFile, Error> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Configuration(format!("not a file: {}", path.display())))?
            .to_owned();
        let content_type = content_type_for(&file_name);

        let size = tokio::fs::metadata(path).await?.len();
        self.policy.check(size, content_type)?;

        let data = tokio::fs::read(path).await?;
        self.upload_image(&file_name, content_type, data).await
    }
}

/// Decode a response envelope, turning error statuses into [`Error`]s.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, Error> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;

    if status.is_success() {
        return serde_json::from_slice(&body).map_err(|e| Error::Deserialization(e.to_string()));
    }

    match serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body) {
        Ok(envelope) => Err(Error::Api {
            status: status.as_u16(),
            message: envelope.message,
            errors: envelope.errors.unwrap_or_default(),
        }),
        Err(_) => {
            let text = String::from_utf8_lossy(&body).trim().to_owned();
            Err(Error::Http {
                status: status.as_u16(),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            })
        }
    }
}

fn require_data<T>(envelope: ApiResponse<T>) -> Result<T, Error> {
    envelope
        .data
        .ok_or_else(|| Error::Deserialization("response carried no data".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = LostFoundClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn health_is_served_from_the_root() {
        let client = LostFoundClient::new("http://localhost:3001/api/");
        assert_eq!(client.health_url(), "http://localhost:3001/health");
        assert_eq!(
            client.item_url("1"),
            "http://localhost:3001/api/items/1"
        );

        let client = LostFoundClient::new("http://localhost:3001");
        assert_eq!(client.health_url(), "http://localhost:3001/health");
    }

    #[test]
    fn item_ids_are_path_encoded() {
        let client = LostFoundClient::new("http://localhost:3001");
        assert_eq!(
            client.item_url("a/b c"),
            "http://localhost:3001/items/a%2Fb%20c"
        );
    }

    #[test]
    fn builder_rejects_non_http_urls() {
        let err = LostFoundClientBuilder::new("localhost:3001").build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_sending() {
        // Nothing listens on port 9; reaching the network would be a
        // connection error instead.
        let client = LostFoundClient::builder("http://127.0.0.1:9")
            .upload_policy(UploadPolicy::new(1024 * 1024))
            .build()
            .unwrap();

        let err = client
            .upload_image("big.png", "image/png", vec![0u8; 1024 * 1024 + 1])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 1MB");

        let err = client
            .upload_image("notes.txt", "text/plain", vec![0u8; 1])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
    }

    #[tokio::test]
    async fn upload_file_checks_policy_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let client = LostFoundClient::new("http://127.0.0.1:9");
        let err = client.upload_file(&path).await.unwrap_err();
        assert!(matches!(err, Error::UploadRejected(_)));

        let err = client
            .upload_file(dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
