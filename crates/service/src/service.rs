use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use lostfound_blob::BlobStore;
use lostfound_core::{
    Item, ItemDraft, ItemPage, ItemQuery, ListParams, ValidationErrors, check_sanitized_draft,
    check_sanitized_patch, validate_create, validate_update,
};
use lostfound_store::ItemStore;

use crate::error::ServiceError;

const REFERENCE_SCAN_LIMIT: u32 = 100;

/// The public item contract: every mutation is validated, then sanitized,
/// then persisted.
///
/// Cheap to clone; all state lives behind the shared store handles.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    image_cleanup: Option<Arc<dyn BlobStore>>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            image_cleanup: None,
        }
    }

    /// Delete the stored image of an item when the item is deleted, if
    /// `blobs` issued its URL.
    #[must_use]
    pub fn with_image_cleanup(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.image_cleanup = Some(blobs);
        self
    }

    pub async fn list(&self, query: &ItemQuery) -> Result<ItemPage, ServiceError> {
        Ok(self.store.list(query).await?)
    }

    /// List from raw query-string parameters.
    pub async fn list_params(&self, params: &ListParams) -> Result<ItemPage, ServiceError> {
        self.list(&ItemQuery::from_params(params)).await
    }

    pub async fn get(&self, id: &str) -> Result<Item, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))
    }

    /// Validate and create an item from a raw JSON payload.
    ///
    /// `date_reported` is always the current time; any client value is
    /// ignored, as is a client-supplied `id`.
    pub async fn create(&self, payload: &Value) -> Result<Item, ServiceError> {
        let draft = validate_create(payload)?.sanitized();
        check_sanitized_draft(&draft)?;

        let item = self.store.create(draft.into_new_item(Utc::now())).await?;
        info!(id = %item.id, item_type = %item.item_type, "item created");
        Ok(item)
    }

    /// Create from a typed draft. The draft goes through the same validation
    /// as a raw payload.
    pub async fn create_draft(&self, draft: &ItemDraft) -> Result<Item, ServiceError> {
        let payload = serde_json::to_value(draft)
            .map_err(|e| ValidationErrors::single(format!("\"value\" {e}")))?;
        self.create(&payload).await
    }

    /// Validate and apply a partial update from a raw JSON payload.
    pub async fn update(&self, id: &str, payload: &Value) -> Result<Item, ServiceError> {
        let patch = validate_update(payload)?.sanitized();
        check_sanitized_patch(&patch)?;

        let item = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))?;
        info!(id = %item.id, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let image_url = match self.image_cleanup {
            Some(_) => self.store.get(id).await?.and_then(|item| item.image_url),
            None => None,
        };

        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id.to_owned()));
        }
        info!(id = %id, "item deleted");

        if let (Some(blobs), Some(url)) = (&self.image_cleanup, image_url) {
            match self.image_in_use(&url).await {
                Ok(false) => remove_image(blobs.as_ref(), &url).await,
                Ok(true) => debug!(url = %url, "image still referenced, leaving it"),
                Err(e) => warn!(url = %url, error = %e, "cannot check image references, leaving it"),
            }
        }
        Ok(())
    }

    /// Whether any stored item still points at `url`.
    async fn image_in_use(&self, url: &str) -> Result<bool, ServiceError> {
        let mut query = ItemQuery::default().with_limit(REFERENCE_SCAN_LIMIT);
        loop {
            let page = self.store.list(&query).await?;
            if page
                .items
                .iter()
                .any(|item| item.image_url.as_deref() == Some(url))
            {
                return Ok(true);
            }
            let seen = query.offset() + page.items.len() as u64;
            if page.items.is_empty() || seen >= page.pagination.total {
                return Ok(false);
            }
            let next_page = query.page + 1;
            query = query.with_page(next_page);
        }
    }
}

/// Best effort: failures are logged and never fail the delete.
async fn remove_image(blobs: &dyn BlobStore, url: &str) {
    let Some(name) = blobs.name_from_url(url) else {
        debug!(url = %url, "image not issued by this store, leaving it");
        return;
    };
    match blobs.delete(&name).await {
        Ok(true) => info!(name = %name, "orphaned image removed"),
        Ok(false) => debug!(name = %name, "image already gone"),
        Err(e) => warn!(name = %name, error = %e, "failed to remove orphaned image"),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use lostfound_blob::MemoryBlobStore;
    use lostfound_core::ItemType;
    use lostfound_store_memory::MemoryItemStore;
    use serde_json::json;

    use super::*;

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryItemStore::new()))
    }

    fn wallet() -> Value {
        json!({
            "type": "lost",
            "name": "Black Wallet",
            "description": "Leather wallet with ID",
            "location": "Central Park",
            "contact_info": "a@b.com"
        })
    }

    #[tokio::test]
    async fn create_stamps_server_time_and_ignores_client_fields() {
        let svc = service();
        let mut payload = wallet();
        payload["id"] = json!("mine");
        payload["date_reported"] = json!("1999-12-31T23:59:59Z");

        let before = Utc::now();
        let item = svc.create(&payload).await.unwrap();
        let after = Utc::now();

        assert_ne!(item.id, "mine");
        assert!(item.date_reported >= before && item.date_reported <= after);
        assert_eq!(svc.get(&item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn create_sanitizes_after_validating() {
        let svc = service();
        let mut payload = wallet();
        payload["description"] = json!("<p>Leather</p><script>steal()</script> wallet");
        let item = svc.create(&payload).await.unwrap();
        assert_eq!(item.description, "Leather wallet");
    }

    #[tokio::test]
    async fn markup_only_name_is_rejected() {
        let svc = service();
        let mut payload = wallet();
        payload["name"] = json!("<img src=x>");
        let err = svc.create(&payload).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.mentions("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_name_is_a_validation_error() {
        let svc = service();
        let mut payload = wallet();
        payload.as_object_mut().unwrap().remove("name");
        let err = svc.create(&payload).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.mentions("name")));
    }

    #[tokio::test]
    async fn update_never_changes_id_or_date() {
        let svc = service();
        let item = svc.create(&wallet()).await.unwrap();
        let updated = svc
            .update(
                &item.id,
                &json!({
                    "id": "hijacked",
                    "date_reported": "2000-01-01T00:00:00Z",
                    "type": "found",
                    "location": " <b>Library</b> "
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.date_reported, item.date_reported);
        assert_eq!(updated.item_type, ItemType::Found);
        assert_eq!(updated.location, "Library");
        assert!(matches!(
            svc.get("hijacked").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let svc = service();
        assert!(matches!(svc.get("nope").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update("nope", &json!({"name": "x"})).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete("nope").await, Err(ServiceError::NotFound(_))));

        let item = svc.create(&wallet()).await.unwrap();
        svc.delete(&item.id).await.unwrap();
        assert!(matches!(svc.get(&item.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(&item.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_update_on_missing_item_reports_validation_first() {
        let svc = service();
        let err = svc.update("nope", &json!({"latitude": 200})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn create_draft_uses_the_same_rules() {
        let svc = service();
        let draft = ItemDraft {
            item_type: ItemType::Found,
            name: "Set of Keys".into(),
            description: "Three keys".into(),
            location: "Main Street Cafe".into(),
            latitude: Some(95.0),
            longitude: None,
            image_url: None,
            contact_info: "jamie@example.com".into(),
        };
        let err = svc.create_draft(&draft).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.mentions("latitude")));
    }

    #[tokio::test]
    async fn delete_removes_own_image_when_enabled() {
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3001/uploads"));
        blobs
            .put("1-abc.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let svc = service().with_image_cleanup(blobs.clone());

        let mut payload = wallet();
        payload["image_url"] = json!(blobs.public_url("1-abc.png"));
        let item = svc.create(&payload).await.unwrap();
        svc.delete(&item.id).await.unwrap();
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn delete_keeps_images_other_items_still_use() {
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3001/uploads"));
        blobs
            .put("1-abc.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let svc = service().with_image_cleanup(blobs.clone());

        let mut payload = wallet();
        payload["image_url"] = json!(blobs.public_url("1-abc.png"));
        let first = svc.create(&payload).await.unwrap();
        let second = svc.create(&payload).await.unwrap();

        svc.delete(&first.id).await.unwrap();
        assert_eq!(blobs.len(), 1);

        svc.delete(&second.id).await.unwrap();
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn image_references_are_found_past_the_first_page() {
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3001/uploads"));
        blobs
            .put("1-abc.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let svc = service().with_image_cleanup(blobs.clone());

        let mut payload = wallet();
        payload["image_url"] = json!(blobs.public_url("1-abc.png"));
        svc.create(&payload).await.unwrap();
        for _ in 0..REFERENCE_SCAN_LIMIT {
            svc.create(&wallet()).await.unwrap();
        }
        let newest = svc.create(&payload).await.unwrap();

        svc.delete(&newest.id).await.unwrap();
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn delete_leaves_foreign_images() {
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3001/uploads"));
        blobs
            .put("1-abc.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let svc = service().with_image_cleanup(blobs.clone());

        let mut payload = wallet();
        payload["image_url"] = json!("https://cdn.example.com/1-abc.png");
        let item = svc.create(&payload).await.unwrap();
        svc.delete(&item.id).await.unwrap();
        assert_eq!(blobs.len(), 1);
    }
}
