/// Configuration for the Postgres item store.
pub struct PostgresItemConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Table name prefix (e.g. "lostfound_").
    pub prefix: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl PostgresItemConfig {
    /// Create a new configuration with the given URL and defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prefix: "lostfound_".to_owned(),
            max_connections: 10,
        }
    }

    /// Set the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the connection pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}
