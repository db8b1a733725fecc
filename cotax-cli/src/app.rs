//! Command implementations, kept free of argument parsing so they can be
//! driven from tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use cotax_core::calculations::{
    AdjustmentLimits, CalculationOutcome, CalculationRequest, CorporateTaxCalculation,
    NewCalculationRequest, RateTables,
};
use cotax_core::db::forms::{load_company_info, save_calculation};
use cotax_core::db::{MemoryStoreFactory, StoreRegistry};
use cotax_core::session::AdjustmentWorkingSet;
use cotax_core::{
    ADJUSTMENT_CATALOG, DbConfig, FinancialInputs, TAX_CLASSIFICATION_CODES, TaxStore,
    TaxpayerCategory, lookup_adjustment, parse_amount,
};
use cotax_data::{FormDataBundle, RateScheduleLoader};
use cotax_db_sqlite::SqliteStoreFactory;
use tracing::{debug, info, warn};

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

pub async fn open_store(database: &DbConfig) -> Result<Box<dyn TaxStore>> {
    debug!("connecting to {} backend", database.backend);
    build_registry()
        .create(database)
        .await
        .with_context(|| format!("Failed to open {} store", database.backend))
}

/// Built-in tables, optionally overridden by a rate CSV.
pub fn rate_tables(rates_csv: Option<&Path>) -> Result<RateTables> {
    let builtin = RateTables::builtin().context("Built-in rate tables are invalid")?;
    match rates_csv {
        None => Ok(builtin),
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            RateScheduleLoader::load_tables(builtin, file)
                .with_context(|| format!("Failed to load rates: {}", path.display()))
        }
    }
}

/// Parses each `CODE=AMOUNT` into a catalog adjustment item.
pub fn parse_adjustments(args: &[String]) -> Result<AdjustmentWorkingSet> {
    let mut set = AdjustmentWorkingSet::new();
    for arg in args {
        let Some((code, amount)) = arg.split_once('=') else {
            bail!("adjustment '{arg}' must look like CODE=AMOUNT");
        };
        let entry = lookup_adjustment(code)
            .with_context(|| format!("unknown adjustment code '{}'", code.trim()))?;
        let amount = parse_amount("adjustment amount", amount)?;
        set.add_from_catalog(entry.code, entry.kind, amount, None)
            .with_context(|| format!("invalid adjustment '{arg}'"))?;
    }
    Ok(set)
}

/// Figures supplied on the command line instead of a request file.
#[derive(Debug, Clone, Default)]
pub struct InlineInputs {
    pub revenue: String,
    pub book_income: String,
    pub expenses: String,
    pub adjustments: Vec<String>,
}

/// Where the `calculate` command takes its request from.
#[derive(Debug, Clone)]
pub enum RequestSource {
    File(PathBuf),
    Inline(InlineInputs),
}

/// Builds a request from the saved company forms and inline figures.
pub async fn request_from_store(
    store: &dyn TaxStore,
    inline: &InlineInputs,
) -> Result<CalculationRequest> {
    let company = load_company_info(store)
        .await
        .context("Failed to load company information")?;
    let inputs = FinancialInputs::parse(&inline.revenue, &inline.book_income, &inline.expenses)?;
    let adjustments = parse_adjustments(&inline.adjustments)?;

    Ok(CalculationRequest {
        company,
        inputs,
        adjustments: adjustments.items().to_vec(),
    })
}

/// Reads a request file, validating every adjustment and giving it an id.
pub fn read_request(path: &Path) -> Result<CalculationRequest> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let request: NewCalculationRequest = serde_json::from_reader(file)
        .with_context(|| format!("Invalid request: {}", path.display()))?;
    request
        .into_request()
        .with_context(|| format!("Invalid adjustment in request: {}", path.display()))
}

/// Runs one calculation.
pub fn calculate(
    tables: &RateTables,
    request: &CalculationRequest,
    calculated_at: DateTime<Utc>,
) -> Result<CalculationOutcome> {
    if let Err(err) = request.company.validate() {
        warn!(%err, "company information is incomplete");
    }

    let outcome = CorporateTaxCalculation::new(tables).calculate_at(request, calculated_at)?;
    for warning in &outcome.tax_return.warnings {
        warn!("{warning}");
    }
    Ok(outcome)
}

/// Stores the results and the tax return record of `outcome`.
pub async fn save_outcome(store: &dyn TaxStore, outcome: &CalculationOutcome) -> Result<()> {
    save_calculation(store, outcome)
        .await
        .context("Failed to save calculation")
}

/// The `calculate` command.
///
/// The store is opened only when the request is built from saved forms or
/// the outcome is to be saved.
pub async fn run_calculate(
    database: &DbConfig,
    source: RequestSource,
    tables: &RateTables,
    calculated_at: DateTime<Utc>,
    save: bool,
) -> Result<CalculationOutcome> {
    let (request, store) = match source {
        RequestSource::File(path) => (read_request(&path)?, None),
        RequestSource::Inline(inline) => {
            let store = open_store(database).await?;
            (request_from_store(store.as_ref(), &inline).await?, Some(store))
        }
    };

    let outcome = calculate(tables, &request, calculated_at)?;
    if save {
        let store = match store {
            Some(store) => store,
            None => open_store(database).await?,
        };
        save_outcome(store.as_ref(), &outcome).await?;
    }
    Ok(outcome)
}

pub fn limits(
    revenue: &str,
    total_salary: Option<&str>,
    taxable_income: Option<&str>,
) -> Result<AdjustmentLimits> {
    let revenue = parse_amount("revenue", revenue)?;
    let total_salary = total_salary
        .map(|s| parse_amount("total_salary", s))
        .transpose()?;
    let taxable_income = taxable_income
        .map(|s| parse_amount("taxable_income", s))
        .transpose()?;
    Ok(AdjustmentLimits::compute(revenue, total_salary, taxable_income))
}

pub async fn export<W: Write>(
    store: &dyn TaxStore,
    writer: W,
    exported_at: DateTime<Utc>,
) -> Result<()> {
    FormDataBundle::export(store, exported_at)
        .await?
        .to_writer(writer)?;
    Ok(())
}

pub async fn import(store: &dyn TaxStore, path: &Path) -> Result<usize> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let bundle = FormDataBundle::from_reader(file)
        .with_context(|| format!("Not a cotax data file: {}", path.display()))?;
    let written = bundle.import(store).await?;
    info!(path = %path.display(), sections = written.len(), "import complete");
    Ok(written.len())
}

/// Classification and adjustment code tables as plain text.
pub fn write_codes<W: Write>(mut out: W, include_adjustments: bool) -> Result<()> {
    writeln!(out, "{:<4} {:<6} 명칭", "코드", "구분")?;
    for code in TAX_CLASSIFICATION_CODES {
        let kind = if code.for_profit { "영리" } else { "비영리" };
        writeln!(out, "{:<4} {:<6} {}", code.code, kind, code.name)?;
    }

    if include_adjustments {
        writeln!(out)?;
        for entry in ADJUSTMENT_CATALOG {
            writeln!(
                out,
                "{:<4} {:<14} {}",
                entry.code,
                entry.kind.as_str(),
                entry.name
            )?;
        }
    }
    Ok(())
}

/// The rate tables in effect, as JSON.
pub fn write_rates<W: Write>(out: W, tables: &RateTables) -> Result<()> {
    let schedules: Vec<_> = [
        TaxpayerCategory::General,
        TaxpayerCategory::SmallBusiness,
        TaxpayerCategory::NonProfit,
    ]
    .into_iter()
    .map(|category| tables.schedule(category))
    .collect();
    let document = serde_json::json!({
        "small_business_revenue_ceiling": tables.small_business_revenue_ceiling(),
        "schedules": schedules,
    });
    serde_json::to_writer_pretty(out, &document)?;
    Ok(())
}
