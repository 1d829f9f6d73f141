mod logging;
mod server;
mod storage;
mod store;
mod uploads;

pub use logging::*;
pub use server::*;
pub use storage::*;
pub use store::*;
pub use uploads::*;

use serde::Deserialize;

/// Environment variable that overrides `[store] url`.
pub const DATABASE_URL_ENV: &str = "LOSTFOUND_DATABASE_URL";

/// Top-level configuration for the Lost & Found server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct LostFoundConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Item store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Object store backend for uploaded images.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload policy.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LostFoundConfig {
    /// Parse a TOML document. An empty document yields the defaults.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|u| !u.is_empty()) {
            self.store.url = Some(url);
        }
    }
}
