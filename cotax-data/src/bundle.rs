//! Export and import of the input forms as one JSON document.
//!
//! ```json
//! {
//!   "company_master": { ... },
//!   "tax_agent_info": { ... },
//!   "account_info": { ... },
//!   "tax_classification": { ... },
//!   "business_year_table": [ ... ],
//!   "exported_at": "2025-03-31T09:00:00Z"
//! }
//! ```

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use cotax_core::{RepositoryError, StorageKey, TaxStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Malformed bundle: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Snapshot of every input form.
///
/// On export, forms never saved are written as an empty object (or an empty
/// list for the business year table). On import, absent or `null` sections
/// leave the stored value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDataBundle {
    #[serde(default)]
    pub company_master: Option<Map<String, Value>>,
    #[serde(default)]
    pub tax_agent_info: Option<Map<String, Value>>,
    #[serde(default)]
    pub account_info: Option<Map<String, Value>>,
    #[serde(default)]
    pub tax_classification: Option<Map<String, Value>>,
    #[serde(default)]
    pub business_year_table: Option<Vec<Value>>,
    pub exported_at: Option<DateTime<Utc>>,
}

impl FormDataBundle {
    /// Reads the five form records out of `store`.
    pub async fn export(
        store: &dyn TaxStore,
        exported_at: DateTime<Utc>,
    ) -> Result<Self, BundleError> {
        let bundle = Self {
            company_master: Some(read_object(store, StorageKey::CompanyMaster).await?),
            tax_agent_info: Some(read_object(store, StorageKey::TaxAgentInfo).await?),
            account_info: Some(read_object(store, StorageKey::AccountInfo).await?),
            tax_classification: Some(read_object(store, StorageKey::TaxClassification).await?),
            business_year_table: Some(read_list(store, StorageKey::BusinessYearTable).await?),
            exported_at: Some(exported_at),
        };
        info!(%exported_at, "form data exported");
        Ok(bundle)
    }

    /// Writes every present section back to `store`, replacing what is there.
    ///
    /// Returns the keys that were written.
    pub async fn import(self, store: &dyn TaxStore) -> Result<Vec<StorageKey>, BundleError> {
        let sections = [
            (StorageKey::CompanyMaster, self.company_master.map(Value::Object)),
            (StorageKey::TaxAgentInfo, self.tax_agent_info.map(Value::Object)),
            (StorageKey::AccountInfo, self.account_info.map(Value::Object)),
            (StorageKey::TaxClassification, self.tax_classification.map(Value::Object)),
            (StorageKey::BusinessYearTable, self.business_year_table.map(Value::Array)),
        ];

        let mut written = Vec::new();
        for (key, value) in sections {
            match value {
                Some(value) => {
                    store.put(key.as_str(), value).await?;
                    written.push(key);
                }
                None => debug!(%key, "section missing from bundle; skipped"),
            }
        }

        info!(sections = written.len(), "form data imported");
        Ok(written)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BundleError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), BundleError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

async fn read_object(
    store: &dyn TaxStore,
    key: StorageKey,
) -> Result<Map<String, Value>, BundleError> {
    match store.get(key.as_str()).await? {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(RepositoryError::Serialization(format!(
            "{key} holds {other} instead of an object"
        ))
        .into()),
    }
}

async fn read_list(store: &dyn TaxStore, key: StorageKey) -> Result<Vec<Value>, BundleError> {
    match store.get(key.as_str()).await? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(RepositoryError::Serialization(format!(
            "{key} holds {other} instead of a list"
        ))
        .into()),
    }
}
