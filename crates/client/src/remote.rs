use async_trait::async_trait;

use lostfound_core::{Item, ItemPage, ItemPatch, ItemQuery, NewItem};
use lostfound_store::{ItemStore, StoreError};

use crate::{Error, LostFoundClient};

/// An [`ItemStore`] that forwards every operation to a Lost & Found server.
///
/// The server stamps `date_reported` itself, so the value carried by a
/// [`NewItem`] is not transmitted.
#[derive(Debug, Clone)]
pub struct RemoteItemStore {
    client: LostFoundClient,
}

impl RemoteItemStore {
    pub fn new(client: LostFoundClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &LostFoundClient {
        &self.client
    }
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Connection(msg) => Self::Connection(msg),
            Error::Deserialization(msg) => Self::Serialization(msg),
            Error::Configuration(msg) => Self::Configuration(msg),
            Error::Api {
                message, errors, ..
            } if !errors.is_empty() => Self::Storage(format!("{message}: {}", errors.join("; "))),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[async_trait]
impl ItemStore for RemoteItemStore {
    async fn list(&self, query: &ItemQuery) -> Result<ItemPage, StoreError> {
        Ok(self.client.list_items(query).await?)
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        match self.client.get_item(id).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        Ok(self.client.create_item(&item.draft()).await?)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Option<Item>, StoreError> {
        match self.client.update_item(id, patch).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        match self.client.delete_item(id).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
