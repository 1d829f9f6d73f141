use bytes::Bytes;

use crate::error::BlobError;
use crate::store::BlobStore;

/// Run the blob store conformance test suite against a fresh store.
///
/// # Errors
///
/// Returns an error if the store fails an operation.
pub async fn run_blob_conformance_tests(store: &dyn BlobStore) -> Result<(), BlobError> {
    test_get_missing(store).await?;
    test_put_get_delete(store).await?;
    test_url_round_trip(store);
    test_rejects_path_names(store).await;
    Ok(())
}

async fn test_get_missing(store: &dyn BlobStore) -> Result<(), BlobError> {
    let got = store.get("1700000000000-missing.png").await?;
    assert!(got.is_none(), "get on missing blob should return None");
    Ok(())
}

async fn test_put_get_delete(store: &dyn BlobStore) -> Result<(), BlobError> {
    let name = "1700000000000-conform01.jpg";
    let data = Bytes::from_static(b"\xff\xd8\xff\xe0 not really a jpeg");
    let meta = store.put(name, "image/jpeg", data.clone()).await?;
    assert_eq!(meta.name, name);
    assert_eq!(meta.size_bytes, data.len() as u64);

    let (fetched, bytes) = store
        .get(name)
        .await?
        .expect("stored blob should be retrievable");
    assert_eq!(bytes, data);
    assert_eq!(fetched.content_type, "image/jpeg");

    assert!(store.delete(name).await?, "delete should report existing blob");
    assert!(store.get(name).await?.is_none(), "get after delete");
    assert!(!store.delete(name).await?, "second delete should report missing");
    Ok(())
}

fn test_url_round_trip(store: &dyn BlobStore) {
    let url = store.public_url("1700000000000-conform02.png");
    assert_eq!(
        store.name_from_url(&url).as_deref(),
        Some("1700000000000-conform02.png")
    );
    assert!(store.name_from_url("https://elsewhere.invalid/x.png").is_none());
}

async fn test_rejects_path_names(store: &dyn BlobStore) {
    let result = store
        .put("../escape.png", "image/png", Bytes::from_static(b"x"))
        .await;
    assert!(
        matches!(result, Err(BlobError::InvalidName(_))),
        "names with path separators must be refused"
    );
}
