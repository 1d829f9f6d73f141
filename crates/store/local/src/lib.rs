//! Local fallback item store.
//!
//! Keeps the whole item list in memory and mirrors it to a single JSON file
//! after every mutation. Useful when no backend is reachable.

mod seed;
mod store;

pub use seed::seed_items;
pub use store::LocalItemStore;
