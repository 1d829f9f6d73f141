use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use lostfound_blob::MemoryBlobStore;
use lostfound_client::{Error, LostFoundClient, RemoteItemStore};
use lostfound_core::{ItemDraft, ItemPatch, ItemQuery, ItemType, NewItem, UploadPolicy};
use lostfound_server::api::{AppState, router};
use lostfound_service::ItemService;
use lostfound_store::ItemStore;
use lostfound_store_memory::MemoryItemStore;

/// Serve a fresh in-memory app on an ephemeral port and return its root URL.
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");

    let state = AppState {
        service: ItemService::new(Arc::new(MemoryItemStore::new())),
        blobs: Arc::new(MemoryBlobStore::new(format!("{base}/uploads"))),
        policy: UploadPolicy::default(),
        environment: Arc::from("test"),
    };
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    base
}

fn draft(item_type: ItemType, name: &str) -> ItemDraft {
    ItemDraft {
        item_type,
        name: name.to_owned(),
        description: format!("{name}, reported in a test"),
        location: "Central Station".to_owned(),
        latitude: Some(40.75),
        longitude: Some(-73.99),
        image_url: None,
        contact_info: "tester@example.com".to_owned(),
    }
}

#[tokio::test]
async fn health_through_api_mount() {
    let base = spawn_server().await;
    let client = LostFoundClient::new(format!("{base}/api"));
    let health = client.health().await.unwrap();
    assert_eq!(health.environment, "test");
}

#[tokio::test]
async fn item_lifecycle() {
    let base = spawn_server().await;
    let client = LostFoundClient::new(&base);

    let created = client
        .create_item(&draft(ItemType::Lost, "Black Wallet"))
        .await
        .unwrap();
    assert_eq!(created.name, "Black Wallet");
    assert_eq!(client.get_item(&created.id).await.unwrap(), created);

    let updated = client
        .update_item(
            &created.id,
            &ItemPatch {
                item_type: Some(ItemType::Found),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.item_type, ItemType::Found);
    assert_eq!(updated.date_reported, created.date_reported);

    let page = client
        .list_items(&ItemQuery::default().with_type(ItemType::Found))
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].id, created.id);

    client.delete_item(&created.id).await.unwrap();
    let err = client.get_item(&created.id).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[tokio::test]
async fn validation_errors_carry_details() {
    let base = spawn_server().await;
    let client = LostFoundClient::new(&base);

    let mut bad = draft(ItemType::Lost, "Umbrella");
    bad.latitude = Some(120.0);
    let err = client.create_item(&bad).await.unwrap_err();
    match err {
        Error::Api {
            status,
            message,
            errors,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Validation error");
            assert!(errors.iter().any(|e| e.contains("\"latitude\"")));
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(!Error::Api {
        status: 400,
        message: String::new(),
        errors: vec![]
    }
    .is_retryable());
}

#[tokio::test]
async fn upload_round_trip() {
    let base = spawn_server().await;
    let client = LostFoundClient::new(&base);

    let file = client
        .upload_image("wallet.jpg", "image/jpeg", b"\xff\xd8\xffjpeg".to_vec())
        .await
        .unwrap();
    assert!(file.file_name.ends_with(".jpg"));
    assert_eq!(file.mime_type, "image/jpeg");
    assert!(file.file_url.starts_with(&base));

    let mut with_image = draft(ItemType::Found, "Camera");
    with_image.image_url = Some(file.file_url.clone());
    let item = client.create_item(&with_image).await.unwrap();
    assert_eq!(item.image_url.as_deref(), Some(file.file_url.as_str()));
}

#[tokio::test]
async fn unreachable_server_is_a_retryable_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LostFoundClient::new(format!("http://{addr}"));
    let err = client.list_items(&ItemQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Connection(_)), "{err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn remote_store_maps_missing_items() {
    let base = spawn_server().await;
    let store = RemoteItemStore::new(LostFoundClient::new(&base));

    assert!(store.get("nope").await.unwrap().is_none());
    assert!(store.update("nope", &ItemPatch::default()).await.unwrap().is_none());
    assert!(!store.delete("nope").await.unwrap());

    let created = store
        .create(NewItem {
            item_type: ItemType::Lost,
            name: "Scarf".into(),
            description: "Red wool".into(),
            location: "Library".into(),
            latitude: None,
            longitude: None,
            image_url: None,
            contact_info: "555-0100".into(),
            date_reported: Utc::now(),
        })
        .await
        .unwrap();
    assert_eq!(store.get(&created.id).await.unwrap(), Some(created.clone()));
    assert!(store.delete(&created.id).await.unwrap());
    assert!(!store.delete(&created.id).await.unwrap());

    let page = store.list(&ItemQuery::default()).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn remote_store_rejections_surface_as_storage_errors() {
    let base = spawn_server().await;
    let store = RemoteItemStore::new(LostFoundClient::new(&base));
    let item = store
        .create(NewItem {
            item_type: ItemType::Found,
            name: "Keys".into(),
            description: "Three keys".into(),
            location: "Cafe".into(),
            latitude: None,
            longitude: None,
            image_url: None,
            contact_info: "x@y.z".into(),
            date_reported: Utc::now(),
        })
        .await
        .unwrap();

    let patch: ItemPatch = serde_json::from_value(json!({"image_url": "not a url"})).unwrap();
    let err = store.update(&item.id, &patch).await.unwrap_err();
    assert!(err.to_string().contains("\"image_url\""), "{err}");
}
