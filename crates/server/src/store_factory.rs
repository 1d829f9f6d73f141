use std::sync::Arc;

use lostfound_store::ItemStore;
use lostfound_store_local::LocalItemStore;
use lostfound_store_memory::MemoryItemStore;
#[cfg(feature = "postgres")]
use lostfound_store_postgres::{PostgresItemConfig, PostgresItemStore};

use crate::config::StoreConfig;
use crate::error::ServerError;

/// Create an item store from the given configuration.
#[allow(clippy::unused_async)]
pub async fn create_item_store(config: &StoreConfig) -> Result<Arc<dyn ItemStore>, ServerError> {
    let store: Arc<dyn ItemStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryItemStore::new()),
        "local" => {
            let store = LocalItemStore::open(&config.path)
                .await
                .map_err(|e| ServerError::Config(format!("local store: {e}")))?;
            Arc::new(store)
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = config.url.as_deref().ok_or_else(|| {
                ServerError::Config("postgres store backend requires [store] url".into())
            })?;

            let pg_config = PostgresItemConfig::new(url).with_prefix(&config.prefix);
            let store = PostgresItemStore::new(&pg_config)
                .await
                .map_err(|e| ServerError::Config(format!("postgres store: {e}")))?;

            Arc::new(store)
        }
        other => {
            return Err(ServerError::Config(format!(
                "unsupported store backend: {other}"
            )));
        }
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let store = create_item_store(&StoreConfig::default()).await.unwrap();
        let page = store
            .list(&lostfound_core::ItemQuery::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn local_backend_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: "local".into(),
            path: dir.path().join("items.json").display().to_string(),
            ..StoreConfig::default()
        };
        let store = create_item_store(&config).await.unwrap();
        assert!(store.get("1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_backend_is_a_config_error() {
        let config = StoreConfig {
            backend: "cassandra".into(),
            ..StoreConfig::default()
        };
        let err = create_item_store(&config).await.err().unwrap();
        assert!(err.to_string().contains("unsupported store backend: cassandra"));
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn postgres_requires_url() {
        let config = StoreConfig {
            backend: "postgres".into(),
            ..StoreConfig::default()
        };
        let err = create_item_store(&config).await.err().unwrap();
        assert!(err.to_string().contains("requires [store] url"));
    }
}
