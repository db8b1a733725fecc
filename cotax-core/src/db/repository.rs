use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Well-known keys the application reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    CompanyMaster,
    TaxAgentInfo,
    AccountInfo,
    TaxClassification,
    BusinessYearTable,
    CalculationResults,
    TaxReturnData,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        Self::CompanyMaster,
        Self::TaxAgentInfo,
        Self::AccountInfo,
        Self::TaxClassification,
        Self::BusinessYearTable,
        Self::CalculationResults,
        Self::TaxReturnData,
    ];

    /// The keys filled in by the input forms, in form order.
    pub const FORMS: [StorageKey; 5] = [
        Self::CompanyMaster,
        Self::TaxAgentInfo,
        Self::AccountInfo,
        Self::TaxClassification,
        Self::BusinessYearTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyMaster => "cotax_company_master",
            Self::TaxAgentInfo => "cotax_tax_agent_info",
            Self::AccountInfo => "cotax_account_info",
            Self::TaxClassification => "cotax_tax_classification",
            Self::BusinessYearTable => "cotax_business_year_table",
            Self::CalculationResults => "cotax_tax_calculation_results",
            Self::TaxReturnData => "cotax_tax_return_data",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value storage for form records and calculation snapshots.
///
/// Values are JSON documents; backends store them opaquely.
#[async_trait]
pub trait TaxStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError>;

    /// Inserts or replaces the value stored under `key`.
    async fn put(&self, key: &str, value: Value) -> Result<(), RepositoryError>;

    /// Returns `true` if a value was removed.
    async fn remove(&self, key: &str) -> Result<bool, RepositoryError>;

    /// Every stored key, sorted.
    async fn keys(&self) -> Result<Vec<String>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keys_round_trip_through_parse() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn unknown_key_does_not_parse() {
        assert_eq!(StorageKey::parse("cotax_unknown"), None);
    }

    #[test]
    fn form_keys_exclude_calculation_output() {
        assert!(!StorageKey::FORMS.contains(&StorageKey::CalculationResults));
        assert!(!StorageKey::FORMS.contains(&StorageKey::TaxReturnData));
    }

    #[test]
    fn json_error_becomes_serialization_error() {
        let err = serde_json::from_str::<Value>("{").unwrap_err();

        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::Serialization(_)
        ));
    }
}
