use thiserror::Error;

use lostfound_core::UploadRejected;

/// Errors that can occur during blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The file failed the upload policy and was never stored.
    #[error(transparent)]
    Rejected(#[from] UploadRejected),

    /// The name is not one this store could have issued.
    #[error("invalid blob name: {0}")]
    InvalidName(String),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),
}
