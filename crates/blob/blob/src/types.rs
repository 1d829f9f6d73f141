use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Storage name, as produced by `generate_file_name`.
    pub name: String,
    /// MIME content type (e.g. `"image/png"`).
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// When the blob was stored.
    pub created_at: DateTime<Utc>,
}

/// Maps blob names to public URLs under a fixed base and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrl {
    base: String,
}

impl PublicUrl {
    /// `base` is the URL prefix every blob is served under, e.g.
    /// `http://localhost:3001/uploads`. A trailing `/` is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_owned(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The public URL for `name`.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{name}", self.base)
    }

    /// The blob name a URL issued by [`url_for`](Self::url_for) refers to.
    ///
    /// Returns `None` for foreign URLs and for anything that is not a single
    /// path segment below the base.
    pub fn name_for<'a>(&self, url: &'a str) -> Option<&'a str> {
        let rest = url.strip_prefix(self.base.as_str())?.strip_prefix('/')?;
        let name = rest.split(['?', '#']).next().unwrap_or_default();
        (!name.is_empty() && !name.contains('/')).then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_round_trip() {
        let urls = PublicUrl::new("http://localhost:3001/uploads/");
        let url = urls.url_for("1-abc.png");
        assert_eq!(url, "http://localhost:3001/uploads/1-abc.png");
        assert_eq!(urls.name_for(&url), Some("1-abc.png"));
    }

    #[test]
    fn foreign_urls_are_not_ours() {
        let urls = PublicUrl::new("http://localhost:3001/uploads");
        assert_eq!(urls.name_for("https://cdn.example.com/uploads/1-a.png"), None);
        assert_eq!(urls.name_for("http://localhost:3001/uploads/a/b.png"), None);
        assert_eq!(urls.name_for("http://localhost:3001/uploads/"), None);
        assert_eq!(urls.name_for("http://localhost:3001/uploadsx/1.png"), None);
    }
}
