pub mod calculations;
pub mod db;
pub mod models;
pub mod session;

pub use db::{DbConfig, RepositoryError, StorageKey, TaxStore};
pub use models::*;
