pub mod factory;
pub mod forms;
pub mod memory;
pub mod repository;

pub use factory::{DbConfig, StoreFactory, StoreRegistry};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use repository::{RepositoryError, StorageKey, TaxStore};
