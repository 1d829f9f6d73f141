use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use lostfound_core::{Item, ItemPage, ItemPatch, ItemQuery, NewItem};
use lostfound_store::error::StoreError;
use lostfound_store::filter::apply_query;
use lostfound_store::store::ItemStore;

use crate::seed::seed_items;

/// Item store persisted as a JSON array in a local file.
///
/// The list is kept newest-insert-first. All mutations hold the write lock
/// while the file is rewritten, so the file always holds a complete list.
pub struct LocalItemStore {
    path: PathBuf,
    items: RwLock<Vec<Item>>,
}

impl LocalItemStore {
    /// Open the store at `path`.
    ///
    /// A missing, empty or unreadable file is replaced by the seed items.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = match load(&path).await {
            Some(items) if !items.is_empty() => items,
            _ => {
                debug!(path = %path.display(), "seeding local item store");
                let seeds = seed_items();
                persist(&path, &seeds).await?;
                seeds
            }
        };
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Open the store at `path` with an explicit starting list, overwriting
    /// whatever the file holds.
    pub async fn create_with(path: impl Into<PathBuf>, items: Vec<Item>) -> Result<Self, StoreError> {
        let path = path.into();
        persist(&path, &items).await?;
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored item in storage order.
    #[cfg(test)]
    async fn snapshot(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }
}

async fn load(path: &Path) -> Option<Vec<Item>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "local item store unreadable, reseeding");
            return None;
        }
    };
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "local item store corrupt, reseeding");
            None
        }
    }
}

/// Write to a sibling temp file and rename it over the target.
async fn persist(path: &Path, items: &[Item]) -> Result<(), StoreError> {
    let json =
        serde_json::to_vec_pretty(items).map_err(|e| StoreError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl ItemStore for LocalItemStore {
    async fn list(&self, query: &ItemQuery) -> Result<ItemPage, StoreError> {
        let items = self.items.read().await;
        Ok(apply_query(query, items.iter()))
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        let item = item.into_item(uuid::Uuid::new_v4().to_string());
        let mut items = self.items.write().await;
        let mut next = Vec::with_capacity(items.len() + 1);
        next.push(item.clone());
        next.extend(items.iter().cloned());
        persist(&self.path, &next).await?;
        *items = next;
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        let Some(pos) = items.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let mut next = items.clone();
        patch.apply_to(&mut next[pos]);
        let updated = next[pos].clone();
        persist(&self.path, &next).await?;
        *items = next;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        let Some(pos) = items.iter().position(|i| i.id == id) else {
            return Ok(false);
        };
        let mut next = items.clone();
        next.remove(pos);
        persist(&self.path, &next).await?;
        *items = next;
        Ok(true)
    }
}
