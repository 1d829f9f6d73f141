pub mod error;
pub mod memory;
pub mod store;
pub mod testing;
pub mod types;
pub mod upload;

pub use error::BlobError;
pub use memory::MemoryBlobStore;
pub use store::BlobStore;
pub use types::{PublicUrl, StoredBlob};
pub use upload::store_upload;
