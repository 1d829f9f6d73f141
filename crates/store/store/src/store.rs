use async_trait::async_trait;

use lostfound_core::{Item, ItemPage, ItemPatch, ItemQuery, NewItem};

use crate::error::StoreError;

/// Trait for item storage backends.
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
/// Payloads reaching a store have already been validated and sanitized;
/// stores only persist, look up and filter.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Filter, sort newest first and paginate.
    async fn list(&self, query: &ItemQuery) -> Result<ItemPage, StoreError>;

    /// Fetch one item. `None` if no item has this identifier.
    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Persist a new item, assigning its identifier.
    async fn create(&self, item: NewItem) -> Result<Item, StoreError>;

    /// Apply a partial update. `None` if no item has this identifier.
    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Option<Item>, StoreError>;

    /// Remove an item. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}
