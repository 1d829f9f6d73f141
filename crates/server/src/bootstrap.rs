use std::sync::Arc;

use tracing::info;

use lostfound_service::ItemService;

use crate::api::AppState;
use crate::blob_factory::create_blob_store;
use crate::config::LostFoundConfig;
use crate::error::ServerError;
use crate::store_factory::create_item_store;

/// Build the shared handler state from configuration.
pub async fn build_state(config: &LostFoundConfig) -> Result<AppState, ServerError> {
    let store = create_item_store(&config.store).await?;
    info!(backend = %config.store.backend, "item store ready");

    let blobs = create_blob_store(&config.storage, &config.server).await?;
    info!(backend = %config.storage.backend, "object store ready");

    let mut service = ItemService::new(store);
    if config.uploads.cleanup_on_delete {
        service = service.with_image_cleanup(Arc::clone(&blobs));
        info!("orphaned image cleanup enabled");
    }

    Ok(AppState {
        service,
        blobs,
        policy: config.uploads.policy(),
        environment: Arc::from(config.server.environment.as_str()),
    })
}
