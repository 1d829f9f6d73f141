/// Errors that can occur during item store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Store configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}
