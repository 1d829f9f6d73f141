pub mod error;
pub mod filter;
pub mod store;
pub mod testing;

pub use error::StoreError;
pub use filter::{apply_query, matches_query, sort_newest_first};
pub use store::ItemStore;
