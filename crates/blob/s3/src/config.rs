use serde::{Deserialize, Serialize};

/// Configuration for the S3 blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3BlobConfig {
    /// Bucket that receives uploads (e.g. `"item-images"`).
    pub bucket: String,

    /// AWS region (e.g. `"us-east-1"`).
    #[serde(default = "default_region")]
    pub region: String,

    /// Optional endpoint URL override for S3-compatible services
    /// (`MinIO`, `LocalStack`).
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Key prefix for every object (e.g. `"uploads/"`).
    #[serde(default)]
    pub prefix: Option<String>,

    /// Base URL objects are publicly served under. Defaults to the
    /// virtual-hosted bucket URL, or `{endpoint_url}/{bucket}` when an
    /// endpoint override is set.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

impl S3BlobConfig {
    /// Create a new configuration for `bucket` with default region.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: default_region(),
            endpoint_url: None,
            prefix: None,
            public_base_url: None,
        }
    }

    /// Set the AWS region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the endpoint URL override.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Object key for a blob name.
    pub fn key_for(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_owned(),
        }
    }

    /// The URL prefix every object key is publicly served under.
    pub fn resolved_public_base(&self) -> String {
        let base = if let Some(ref url) = self.public_base_url {
            url.trim_end_matches('/').to_owned()
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
        } else {
            format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
        };
        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{base}/{prefix}"),
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_public_base_is_virtual_hosted() {
        let config = S3BlobConfig::new("item-images").with_region("eu-west-1");
        assert_eq!(
            config.resolved_public_base(),
            "https://item-images.s3.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn endpoint_override_uses_path_style() {
        let config = S3BlobConfig::new("item-images")
            .with_endpoint_url("http://localhost:9000/")
            .with_prefix("uploads/");
        assert_eq!(
            config.resolved_public_base(),
            "http://localhost:9000/item-images/uploads"
        );
        assert_eq!(config.key_for("1-a.png"), "uploads/1-a.png");
    }

    #[test]
    fn explicit_public_base_wins() {
        let config = S3BlobConfig::new("b").with_public_base_url("https://cdn.example.com/");
        assert_eq!(config.resolved_public_base(), "https://cdn.example.com");
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: S3BlobConfig = serde_json::from_str(r#"{"bucket":"item-images"}"#).unwrap();
        assert_eq!(config.region, "us-east-1");
        assert!(config.prefix.is_none());
    }
}
