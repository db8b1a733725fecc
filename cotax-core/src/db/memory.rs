//! In-process store, used for tests and throwaway sessions.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::factory::{DbConfig, StoreFactory};
use super::repository::{RepositoryError, TaxStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, BTreeMap<String, Value>>, RepositoryError> {
        self.entries
            .lock()
            .map_err(|e| RepositoryError::Database(format!("memory store poisoned: {e}")))
    }
}

#[async_trait]
impl TaxStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), RepositoryError> {
        self.entries()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, RepositoryError> {
        Ok(self.entries()?.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}

/// Registers the `memory` backend; the connection string is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &DbConfig) -> Result<Box<dyn TaxStore>, RepositoryError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryStore::new();

        store.put("a", json!({"x": 1})).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_existing_value() {
        let store = MemoryStore::new();

        store.put("a", json!(1)).await.unwrap();
        store.put("a", json!(2)).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn remove_reports_whether_key_existed() {
        let store = MemoryStore::new();
        store.put("a", json!(1)).await.unwrap();

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.put("b", json!(1)).await.unwrap();
        store.put("a", json!(1)).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let store = MemoryStoreFactory
            .create(&DbConfig::default())
            .await
            .unwrap();

        assert!(store.keys().await.unwrap().is_empty());
    }
}
