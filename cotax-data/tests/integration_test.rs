//! Integration tests for rate loading and form bundles against a real store.

use chrono::Utc;
use cotax_core::calculations::{CalculationRequest, CorporateTaxCalculation, RateTables};
use cotax_core::db::{DbConfig, StoreFactory};
use cotax_core::{CompanyInfo, FinancialInputs, StorageKey, TaxStore, TaxpayerCategory};
use cotax_data::{FormDataBundle, RateScheduleLoader};
use cotax_db_sqlite::SqliteStoreFactory;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

const CORPORATE_RATES_CSV: &str = include_str!("../test-data/corporate_rates.csv");
const REDUCED_NON_PROFIT_CSV: &str = include_str!("../test-data/reduced_non_profit.csv");

async fn setup_test_store(dir: &tempfile::TempDir) -> Box<dyn TaxStore> {
    let config = DbConfig {
        backend: "sqlite".to_string(),
        connection_string: dir.path().join("cotax.db").display().to_string(),
    };
    SqliteStoreFactory
        .create(&config)
        .await
        .expect("Failed to open sqlite store")
}

fn non_profit_request() -> CalculationRequest {
    CalculationRequest {
        company: CompanyInfo {
            company_name: "재단법인 코택스".to_string(),
            tax_classification: "84".to_string(),
            ..Default::default()
        },
        inputs: FinancialInputs {
            revenue: dec!(3000000000),
            book_income: dec!(1000000000),
            expenses: dec!(2000000000),
        },
        adjustments: Vec::new(),
    }
}

#[test]
fn test_file_rates_reproduce_builtin_tables() {
    let builtin = RateTables::builtin().expect("Built-in tables should validate");

    let loaded = RateScheduleLoader::load_tables(builtin.clone(), CORPORATE_RATES_CSV.as_bytes())
        .expect("Failed to load rates");

    assert_eq!(loaded, builtin);
}

#[test]
fn test_custom_schedule_changes_calculation() {
    let builtin = RateTables::builtin().expect("Built-in tables should validate");
    let tables = RateScheduleLoader::load_tables(builtin, REDUCED_NON_PROFIT_CSV.as_bytes())
        .expect("Failed to load rates");

    let outcome = CorporateTaxCalculation::new(&tables)
        .calculate(&non_profit_request())
        .expect("Calculation should succeed");

    assert_eq!(outcome.results.category, TaxpayerCategory::NonProfit);
    // 100,000,000 × 9% + 900,000,000 × 10%
    assert_eq!(outcome.tax_return.tax.corporate_tax, dec!(99000000));
    assert_eq!(outcome.tax_return.tax.local_income_tax, dec!(9900000));
}

#[tokio::test]
async fn test_bundle_moves_forms_between_databases() {
    let source_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let target_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let source = setup_test_store(&source_dir).await;
    let target = setup_test_store(&target_dir).await;

    source
        .put(
            StorageKey::CompanyMaster.as_str(),
            json!({"company_name": "주식회사 코택스", "company_reg_no": "110111-0012345"}),
        )
        .await
        .expect("Failed to seed company master");
    source
        .put(
            StorageKey::TaxClassification.as_str(),
            json!({"tax_classification": "30"}),
        )
        .await
        .expect("Failed to seed classification");

    let path = source_dir.path().join("cotax_data.json");
    let bundle = FormDataBundle::export(source.as_ref(), Utc::now())
        .await
        .expect("Export should succeed");
    bundle
        .to_writer(std::fs::File::create(&path).expect("Failed to create bundle file"))
        .expect("Failed to write bundle");

    let imported = FormDataBundle::from_reader(std::fs::File::open(&path).expect("Missing bundle"))
        .expect("Bundle should parse");
    let written = imported
        .import(target.as_ref())
        .await
        .expect("Import should succeed");

    assert_eq!(written.len(), 5);
    assert_eq!(
        target.get(StorageKey::TaxClassification.as_str()).await,
        Ok(Some(json!({"tax_classification": "30"})))
    );
    assert_eq!(
        target.get(StorageKey::TaxAgentInfo.as_str()).await,
        Ok(Some(json!({})))
    );
}
