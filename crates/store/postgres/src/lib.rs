pub mod config;
pub mod migrations;
pub mod store;

pub use config::PostgresItemConfig;
pub use store::PostgresItemStore;
