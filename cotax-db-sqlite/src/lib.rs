mod factory;
mod repository;

pub use factory::{SqliteStoreFactory, connection_url};
pub use repository::SqliteStore;
