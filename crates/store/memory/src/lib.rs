mod store;

pub use store::MemoryItemStore;
