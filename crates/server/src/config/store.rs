use serde::Deserialize;

/// Item store backend configuration.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Which backend to use: `"memory"`, `"local"` or `"postgres"`.
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Connection URL for the `postgres` backend.
    ///
    /// Overridden by `LOSTFOUND_DATABASE_URL` when set.
    pub url: Option<String>,
    /// Table name prefix for the `postgres` backend.
    #[serde(default = "default_store_prefix")]
    pub prefix: String,
    /// JSON file for the `local` backend.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            url: None,
            prefix: default_store_prefix(),
            path: default_store_path(),
        }
    }
}

fn default_store_backend() -> String {
    "memory".to_owned()
}

fn default_store_prefix() -> String {
    "lostfound_".to_owned()
}

fn default_store_path() -> String {
    "lostfound-items.json".to_owned()
}
