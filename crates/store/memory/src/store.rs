use async_trait::async_trait;
use dashmap::DashMap;

use lostfound_core::{Item, ItemPage, ItemPatch, ItemQuery, NewItem};
use lostfound_store::error::StoreError;
use lostfound_store::filter::apply_query;
use lostfound_store::store::ItemStore;

/// In-memory item store using `DashMap`. Suitable for development and testing.
pub struct MemoryItemStore {
    items: DashMap<String, Item>,
}

impl MemoryItemStore {
    /// Create a new empty in-memory item store.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Create a store pre-populated with `items`, keyed by their existing ids.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let store = Self::new();
        for item in items {
            store.items.insert(item.id.clone(), item);
        }
        store
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self, query: &ItemQuery) -> Result<ItemPage, StoreError> {
        let snapshot: Vec<Item> = self.items.iter().map(|e| e.value().clone()).collect();
        Ok(apply_query(query, &snapshot))
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get(id).map(|r| r.value().clone()))
    }

    async fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        let item = item.into_item(uuid::Uuid::new_v4().to_string());
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get_mut(id).map(|mut entry| {
            patch.apply_to(entry.value_mut());
            entry.value().clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.items.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lostfound_core::ItemType;
    use lostfound_store::testing::run_store_conformance_tests;

    use super::*;

    fn make_new_item(name: &str) -> NewItem {
        NewItem {
            item_type: ItemType::Lost,
            name: name.into(),
            description: "desc".into(),
            location: "Central Park".into(),
            latitude: None,
            longitude: None,
            image_url: None,
            contact_info: "a@b.com".into(),
            date_reported: Utc::now(),
        }
    }

    #[tokio::test]
    async fn conformance() {
        let store = MemoryItemStore::new();
        run_store_conformance_tests(&store).await.unwrap();
    }

    #[tokio::test]
    async fn create_assigns_uuid() {
        let store = MemoryItemStore::new();
        let item = store.create(make_new_item("Wallet")).await.unwrap();
        assert!(uuid::Uuid::parse_str(&item.id).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn with_items_keeps_ids() {
        let seeded = make_new_item("Keys").into_item("seed-1");
        let store = MemoryItemStore::with_items([seeded.clone()]);
        assert_eq!(store.get("seed-1").await.unwrap(), Some(seeded));
    }
}
