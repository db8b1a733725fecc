//! Form records and calculation snapshots on top of a [`TaxStore`].

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::repository::{RepositoryError, StorageKey, TaxStore};
use crate::calculations::CalculationOutcome;
use crate::{CalculationResults, CompanyInfo, TaxReturnRecord};

/// Reads the object stored under `key`, if any.
pub async fn load_form(
    store: &dyn TaxStore,
    key: StorageKey,
) -> Result<Option<Map<String, Value>>, RepositoryError> {
    match store.get(key.as_str()).await? {
        None => Ok(None),
        Some(Value::Object(fields)) => Ok(Some(fields)),
        Some(other) => Err(RepositoryError::Serialization(format!(
            "{key} holds {other} instead of an object"
        ))),
    }
}

/// Merges `fields` into the object stored under `key` and returns the result.
///
/// Fields absent from `fields` keep their stored values.
pub async fn save_form(
    store: &dyn TaxStore,
    key: StorageKey,
    fields: Map<String, Value>,
) -> Result<Map<String, Value>, RepositoryError> {
    let mut merged = load_form(store, key).await?.unwrap_or_default();
    let updated = fields.len();
    merged.extend(fields);

    store
        .put(key.as_str(), Value::Object(merged.clone()))
        .await?;
    debug!(%key, updated, total = merged.len(), "form saved");
    Ok(merged)
}

/// Company master data combined with the tax classification form.
///
/// Either record may be missing; absent fields default to empty.
pub async fn load_company_info(store: &dyn TaxStore) -> Result<CompanyInfo, RepositoryError> {
    let mut fields = load_form(store, StorageKey::CompanyMaster)
        .await?
        .unwrap_or_default();
    if let Some(classification) = load_form(store, StorageKey::TaxClassification).await? {
        fields.extend(classification);
    }

    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Writes both snapshots of a run, replacing whatever was stored before.
pub async fn save_calculation(
    store: &dyn TaxStore,
    outcome: &CalculationOutcome,
) -> Result<(), RepositoryError> {
    store
        .put(
            StorageKey::CalculationResults.as_str(),
            serde_json::to_value(&outcome.results)?,
        )
        .await?;
    store
        .put(
            StorageKey::TaxReturnData.as_str(),
            serde_json::to_value(&outcome.tax_return)?,
        )
        .await?;

    info!(
        company = %outcome.tax_return.declaration.company_name,
        total_tax = %outcome.tax_return.tax.total_tax,
        "calculation saved"
    );
    Ok(())
}

pub async fn load_calculation_results(
    store: &dyn TaxStore
) -> Result<Option<CalculationResults>, RepositoryError> {
    load_typed(store, StorageKey::CalculationResults).await
}

pub async fn load_tax_return(
    store: &dyn TaxStore
) -> Result<Option<TaxReturnRecord>, RepositoryError> {
    load_typed(store, StorageKey::TaxReturnData).await
}

async fn load_typed<T: serde::de::DeserializeOwned>(
    store: &dyn TaxStore,
    key: StorageKey,
) -> Result<Option<T>, RepositoryError> {
    store
        .get(key.as_str())
        .await?
        .map(serde_json::from_value)
        .transpose()
        .map_err(RepositoryError::from)
}
