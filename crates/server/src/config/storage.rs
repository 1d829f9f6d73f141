use serde::Deserialize;

/// Object store configuration for uploaded images.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use: `"memory"`, `"fs"` or `"s3"`.
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Directory for the `fs` backend.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
    /// Bucket name for the `s3` backend.
    pub bucket: Option<String>,
    /// AWS region for the `s3` backend.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible servers.
    pub endpoint_url: Option<String>,
    /// Key prefix inside the bucket.
    pub prefix: Option<String>,
    /// Public base URL uploaded files are reachable under.
    ///
    /// Defaults to `{server base url}/uploads` for the `memory` and `fs`
    /// backends, and to the bucket URL for `s3`.
    pub public_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            dir: default_storage_dir(),
            bucket: None,
            region: None,
            endpoint_url: None,
            prefix: None,
            public_base_url: None,
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_owned()
}

fn default_storage_dir() -> String {
    "uploads".to_owned()
}
