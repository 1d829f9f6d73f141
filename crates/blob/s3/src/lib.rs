pub mod config;
pub mod store;

pub use config::S3BlobConfig;
pub use store::S3BlobStore;
