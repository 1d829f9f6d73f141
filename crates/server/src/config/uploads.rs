use lostfound_core::{DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};
use serde::Deserialize;

/// Image upload configuration.
#[derive(Debug, Deserialize)]
pub struct UploadsConfig {
    /// Largest accepted file in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Remove an item's stored image when the item is deleted. The image is
    /// kept while any other item still points at it.
    #[serde(default)]
    pub cleanup_on_delete: bool,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            cleanup_on_delete: false,
        }
    }
}

impl UploadsConfig {
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.max_bytes)
    }
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}
