use bytes::Bytes;
use tracing::{error, info};

use lostfound_core::{UploadPolicy, UploadedFile, generate_file_name};

use crate::error::BlobError;
use crate::store::BlobStore;

/// Accept an uploaded image: check it against `policy`, store it under a
/// freshly generated name and describe the result.
pub async fn store_upload(
    store: &dyn BlobStore,
    policy: &UploadPolicy,
    original_name: &str,
    content_type: &str,
    data: Bytes,
) -> Result<UploadedFile, BlobError> {
    policy.check(data.len() as u64, content_type)?;

    let name = generate_file_name(original_name, content_type);
    let stored = store
        .put(&name, content_type, data)
        .await
        .inspect_err(|e| error!(name = %name, error = %e, "failed to store upload"))?;

    info!(name = %stored.name, size = stored.size_bytes, "upload stored");
    Ok(UploadedFile {
        file_url: store.public_url(&stored.name),
        file_name: stored.name,
        file_size: stored.size_bytes,
        mime_type: stored.content_type,
    })
}

#[cfg(test)]
mod tests {
    use lostfound_core::UploadRejected;

    use super::*;
    use crate::memory::MemoryBlobStore;

    #[tokio::test]
    async fn accepted_upload_is_stored_and_described() {
        let store = MemoryBlobStore::new("http://localhost:3001/uploads");
        let file = store_upload(
            &store,
            &UploadPolicy::default(),
            "wallet.png",
            "image/png",
            Bytes::from_static(b"\x89PNG"),
        )
        .await
        .unwrap();

        assert!(file.file_name.ends_with(".png"));
        assert_eq!(file.file_size, 4);
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(
            file.file_url,
            format!("http://localhost:3001/uploads/{}", file.file_name)
        );
        assert!(store.get(&file.file_name).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rejected_upload_is_never_stored() {
        let store = MemoryBlobStore::new("http://localhost:3001/uploads");
        let err = store_upload(
            &store,
            &UploadPolicy::new(3),
            "wallet.png",
            "image/png",
            Bytes::from_static(b"four"),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            BlobError::Rejected(UploadRejected::TooLarge { size: 4, limit: 3 })
        ));

        let err = store_upload(
            &store,
            &UploadPolicy::default(),
            "notes.txt",
            "text/plain",
            Bytes::from_static(b"hi"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
        assert!(store.is_empty());
    }
}
