use async_trait::async_trait;
use cotax_core::db::{DbConfig, StoreFactory};
use cotax_core::{RepositoryError, TaxStore};
use tracing::info;

use crate::repository::SqliteStore;

/// Maps a connection string from [`DbConfig`] to a sqlx SQLite URL.
///
/// | input          | URL                    |
/// |----------------|------------------------|
/// | `:memory:`     | `sqlite::memory:`      |
/// | `sqlite:...`   | unchanged              |
/// | `cotax.db`     | `sqlite:cotax.db`      |
pub fn connection_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed == ":memory:" {
        "sqlite::memory:".to_string()
    } else if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite:{trimmed}")
    }
}

/// [`StoreFactory`] for SQLite.
///
/// ```rust,no_run
/// use cotax_core::db::StoreRegistry;
/// use cotax_db_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database, creating the file if needed, and runs migrations.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn TaxStore>, RepositoryError> {
        let url = connection_url(&config.connection_string);
        let store = SqliteStore::new(&url).await?;
        store.run_migrations().await?;
        info!(%url, "sqlite store ready");
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use cotax_core::db::{DbConfig, StoreFactory};
    use pretty_assertions::assert_eq;

    use super::{SqliteStoreFactory, connection_url};

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[test]
    fn connection_url_mapping() {
        assert_eq!(connection_url(":memory:"), "sqlite::memory:");
        assert_eq!(connection_url("cotax.db"), "sqlite:cotax.db");
        assert_eq!(connection_url("sqlite:data/x.db"), "sqlite:data/x.db");
    }

    #[tokio::test]
    async fn creates_in_memory_store() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let result = SqliteStoreFactory.create(&config).await;
        assert!(
            result.is_ok(),
            "failed to create in-memory store: {:#?}",
            result.err()
        );
    }
}
