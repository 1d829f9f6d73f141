use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// External URL clients reach the server at, used to build upload URLs
    /// (e.g. `https://lostfound.example.com`).
    ///
    /// If not set, defaults to `http://localhost:{port}`.
    pub public_url: Option<String>,
    /// Deployment name reported by `GET /health`.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
            environment: default_environment(),
        }
    }
}

impl ServerConfig {
    /// The externally visible base URL, without a trailing `/`.
    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    3001
}

fn default_environment() -> String {
    "development".to_owned()
}
