use lostfound_core::ValidationErrors;
use lostfound_store::StoreError;

/// Errors surfaced by [`ItemService`](crate::ItemService).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The payload broke one or more field rules.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// No item has the given identifier.
    #[error("item not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
