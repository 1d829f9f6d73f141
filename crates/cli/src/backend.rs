use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::debug;

use lostfound_blob::store_upload;
use lostfound_blob_fs::FsBlobStore;
use lostfound_client::{LostFoundClient, RemoteItemStore};
use lostfound_core::{ItemQuery, UploadPolicy, UploadedFile, content_type_for};
use lostfound_service::ItemService;
use lostfound_store_local::LocalItemStore;

/// Characters escaped in a `file://` URL path; `/` is kept as the separator.
const FILE_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// `file://` URL for an absolute directory.
fn file_url(dir: &Path) -> String {
    let path = dir.to_string_lossy().replace('\\', "/");
    let path = path.trim_end_matches('/');
    let sep = if path.starts_with('/') { "" } else { "/" };
    format!("file://{sep}{}", utf8_percent_encode(path, FILE_PATH))
}

/// Where items and images live for this invocation.
pub struct Backend {
    service: ItemService,
    uploads: Uploads,
}

enum Uploads {
    Remote(LostFoundClient),
    Local {
        items_path: PathBuf,
        blobs: FsBlobStore,
        policy: UploadPolicy,
    },
}

/// A short description of the backend for `health`.
pub enum Status {
    Remote { url: String, environment: String },
    Local { path: PathBuf, items: u64 },
}

impl Backend {
    /// Talk to the server at `url`.
    pub fn remote(url: &str) -> anyhow::Result<Self> {
        let client = LostFoundClient::builder(url)
            .build()
            .with_context(|| format!("invalid server URL {url}"))?;
        debug!(url = %client.base_url(), "using remote backend");
        Ok(Self {
            service: ItemService::new(Arc::new(RemoteItemStore::new(client.clone()))),
            uploads: Uploads::Remote(client),
        })
    }

    /// Work on the JSON file at `path`, keeping images under `uploads_dir`.
    pub async fn local(path: &str, uploads_dir: &str) -> anyhow::Result<Self> {
        let store = LocalItemStore::open(path)
            .await
            .with_context(|| format!("failed to open local store {path}"))?;

        let root = std::path::absolute(uploads_dir)
            .with_context(|| format!("invalid uploads directory {uploads_dir}"))?;
        let blobs = FsBlobStore::new(&root, file_url(&root))
            .await
            .with_context(|| format!("failed to prepare uploads directory {}", root.display()))?;
        debug!(path = %path, uploads = %root.display(), "using local backend");

        let items_path = store.path().to_path_buf();
        Ok(Self {
            service: ItemService::new(Arc::new(store)),
            uploads: Uploads::Local {
                items_path,
                blobs,
                policy: UploadPolicy::default(),
            },
        })
    }

    pub fn service(&self) -> &ItemService {
        &self.service
    }

    /// Upload the image at `path`. Files that break the upload policy are
    /// rejected before anything is sent or copied.
    pub async fn upload(&self, path: &Path) -> anyhow::Result<UploadedFile> {
        match &self.uploads {
            Uploads::Remote(client) => Ok(client.upload_file(path).await?),
            Uploads::Local { blobs, policy, .. } => {
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .with_context(|| format!("not a file: {}", path.display()))?;
                let content_type = content_type_for(file_name);

                let size = tokio::fs::metadata(path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?
                    .len();
                policy.check(size, content_type)?;

                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?;
                Ok(store_upload(blobs, policy, file_name, content_type, Bytes::from(data)).await?)
            }
        }
    }

    pub async fn status(&self) -> anyhow::Result<Status> {
        match &self.uploads {
            Uploads::Remote(client) => {
                let health = client.health().await?;
                Ok(Status::Remote {
                    url: client.base_url().to_owned(),
                    environment: health.environment,
                })
            }
            Uploads::Local { items_path, .. } => {
                let page = self.service.list(&ItemQuery::default()).await?;
                Ok(Status::Local {
                    path: items_path.clone(),
                    items: page.pagination.total,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn local_backend(dir: &Path) -> Backend {
        let items = dir.join("items.json");
        let uploads = dir.join("uploads");
        Backend::local(items.to_str().unwrap(), uploads.to_str().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn local_backend_starts_with_seed_items() {
        let dir = tempfile::tempdir().unwrap();
        let backend = local_backend(dir.path()).await;
        let page = backend.service().list(&ItemQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total, 2);

        match backend.status().await.unwrap() {
            Status::Local { path, items } => {
                assert_eq!(path, dir.path().join("items.json"));
                assert_eq!(items, 2);
            }
            Status::Remote { .. } => panic!("expected local status"),
        }
    }

    #[tokio::test]
    async fn local_upload_then_report() {
        let dir = tempfile::tempdir().unwrap();
        let backend = local_backend(dir.path()).await;

        let image = dir.path().join("wallet.png");
        std::fs::write(&image, b"\x89PNG").unwrap();
        let file = backend.upload(&image).await.unwrap();
        assert!(file.file_url.starts_with("file://"));
        assert!(dir.path().join("uploads").join(&file.file_name).exists());

        let item = backend
            .service()
            .create(&json!({
                "type": "found",
                "name": "Wallet",
                "description": "Brown leather",
                "location": "Bus stop",
                "contact_info": "a@b.com",
                "image_url": file.file_url,
            }))
            .await
            .unwrap();
        assert_eq!(item.image_url.as_deref(), Some(file.file_url.as_str()));
    }

    #[tokio::test]
    async fn local_upload_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let backend = local_backend(dir.path()).await;
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hello").unwrap();

        let err = backend.upload(&notes).await.unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
    }

    #[tokio::test]
    async fn local_upload_into_a_spaced_directory() {
        let dir = tempfile::tempdir().unwrap();
        let items = dir.path().join("items.json");
        let uploads = dir.path().join("My Pictures");
        let backend = Backend::local(items.to_str().unwrap(), uploads.to_str().unwrap())
            .await
            .unwrap();

        let image = dir.path().join("keys.png");
        std::fs::write(&image, b"\x89PNG").unwrap();
        let file = backend.upload(&image).await.unwrap();
        assert!(file.file_url.contains("/My%20Pictures/"));
        assert!(uploads.join(&file.file_name).exists());

        let item = backend
            .service()
            .create(&json!({
                "type": "lost",
                "name": "Keys",
                "description": "Three keys on a ring",
                "location": "Library",
                "contact_info": "a@b.com",
                "image_url": file.file_url,
            }))
            .await
            .unwrap();
        assert_eq!(item.image_url.as_deref(), Some(file.file_url.as_str()));
    }

    #[test]
    fn file_urls_escape_path_characters() {
        assert_eq!(
            file_url(Path::new("/tmp/My Pictures/#1")),
            "file:///tmp/My%20Pictures/%231"
        );
        assert_eq!(file_url(Path::new("/srv/uploads/")), "file:///srv/uploads");
    }

    #[test]
    fn remote_backend_rejects_bad_urls() {
        assert!(Backend::remote("localhost:3001").is_err());
        assert!(Backend::remote("http://localhost:3001").is_ok());
    }
}
