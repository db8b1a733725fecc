//! Rate tables and the resolver that picks one for a taxpayer.
//!
//! Selection order:
//!
//! 1. classification code in [`crate::NON_PROFIT_CODES`] → non-profit (flat 10%)
//! 2. code in [`crate::SMALL_BUSINESS_CODES`] and revenue below the ceiling → small business
//! 3. anything else → general
//!
//! A code missing from the classification table still resolves to the
//! general schedule, but the selection carries a [`ClassificationWarning`]
//! so the fallback is visible to the caller.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{CompanyClassification, RateSchedule, ScheduleError, TaxBracket, TaxpayerCategory};

/// Revenue (won) at or above which small-business codes use the general schedule.
pub const SMALL_BUSINESS_REVENUE_CEILING: i64 = 400_000_000_000;

/// `(lower_bound, upper_bound, rate in percent)`
type BracketRow = (i64, Option<i64>, i64);

const GENERAL_BRACKETS: &[BracketRow] = &[
    (0, Some(200_000_000), 10),
    (200_000_001, Some(20_000_000_000), 20),
    (20_000_000_001, Some(300_000_000_000), 22),
    (300_000_000_001, None, 25),
];

const SMALL_BUSINESS_BRACKETS: &[BracketRow] = &[
    (0, Some(200_000_000), 10),
    (200_000_001, Some(20_000_000_000), 20),
    (20_000_000_001, None, 22),
];

const NON_PROFIT_BRACKETS: &[BracketRow] = &[(0, None, 10)];

fn build_schedule(
    category: TaxpayerCategory,
    rows: &[BracketRow],
) -> Result<RateSchedule, ScheduleError> {
    let brackets = rows
        .iter()
        .map(|&(lower, upper, percent)| {
            TaxBracket::new(
                Decimal::from(lower),
                upper.map(Decimal::from),
                Decimal::new(percent, 2),
            )
        })
        .collect();
    RateSchedule::new(category, brackets)
}

/// Warning-level conditions raised while resolving a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClassificationWarning {
    /// No classification code was supplied.
    MissingClassification,
    /// The code is not in the classification table.
    UnknownClassification(String),
}

impl std::fmt::Display for ClassificationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingClassification => {
                f.write_str("no tax classification code; general rates applied")
            }
            Self::UnknownClassification(code) => write!(
                f,
                "unknown tax classification '{code}'; general rates applied"
            ),
        }
    }
}

/// The schedule chosen for a taxpayer, plus any fallback warning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSelection<'a> {
    pub category: TaxpayerCategory,
    pub schedule: &'a RateSchedule,
    pub warning: Option<ClassificationWarning>,
}

/// The three validated schedules and the small-business revenue ceiling.
///
/// Constructed once per calculation context and passed by reference; it is
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTables {
    general: RateSchedule,
    small_business: RateSchedule,
    non_profit: RateSchedule,
    small_business_revenue_ceiling: Decimal,
}

impl RateTables {
    /// The built-in tables, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if a built-in table breaks the schedule
    /// invariants; callers treat this as a startup failure.
    pub fn builtin() -> Result<Self, ScheduleError> {
        Self::new(
            build_schedule(TaxpayerCategory::General, GENERAL_BRACKETS)?,
            build_schedule(TaxpayerCategory::SmallBusiness, SMALL_BUSINESS_BRACKETS)?,
            build_schedule(TaxpayerCategory::NonProfit, NON_PROFIT_BRACKETS)?,
            Decimal::from(SMALL_BUSINESS_REVENUE_CEILING),
        )
    }

    /// Assembles tables from already-validated schedules.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::CategoryMismatch`] if a schedule is passed in
    /// the wrong position.
    pub fn new(
        general: RateSchedule,
        small_business: RateSchedule,
        non_profit: RateSchedule,
        small_business_revenue_ceiling: Decimal,
    ) -> Result<Self, ScheduleError> {
        for (expected, schedule) in [
            (TaxpayerCategory::General, &general),
            (TaxpayerCategory::SmallBusiness, &small_business),
            (TaxpayerCategory::NonProfit, &non_profit),
        ] {
            if schedule.category() != expected {
                return Err(ScheduleError::CategoryMismatch {
                    expected,
                    found: schedule.category(),
                });
            }
        }

        Ok(Self {
            general,
            small_business,
            non_profit,
            small_business_revenue_ceiling,
        })
    }

    /// Returns a copy with `schedule` replacing the one for its category.
    pub fn with_schedule(mut self, schedule: RateSchedule) -> Self {
        match schedule.category() {
            TaxpayerCategory::General => self.general = schedule,
            TaxpayerCategory::SmallBusiness => self.small_business = schedule,
            TaxpayerCategory::NonProfit => self.non_profit = schedule,
        }
        self
    }

    pub fn schedule(&self, category: TaxpayerCategory) -> &RateSchedule {
        match category {
            TaxpayerCategory::General => &self.general,
            TaxpayerCategory::SmallBusiness => &self.small_business,
            TaxpayerCategory::NonProfit => &self.non_profit,
        }
    }

    pub fn small_business_revenue_ceiling(&self) -> Decimal {
        self.small_business_revenue_ceiling
    }

    /// Resolves the schedule for a classification code and revenue.
    pub fn select(&self, classification_code: &str, revenue: Decimal) -> ScheduleSelection<'_> {
        self.select_for(&CompanyClassification::new(classification_code), revenue)
    }

    /// Resolves the schedule for a company's classification record.
    pub fn select_for(
        &self,
        classification: &CompanyClassification,
        revenue: Decimal,
    ) -> ScheduleSelection<'_> {
        let code = classification.tax_classification.trim();
        let category = self.category_for(classification, revenue);

        let warning = if code.is_empty() {
            Some(ClassificationWarning::MissingClassification)
        } else if !classification.is_known() {
            Some(ClassificationWarning::UnknownClassification(code.to_string()))
        } else {
            None
        };

        if let Some(warning) = &warning {
            warn!(code, %warning, "falling back to general rate schedule");
        }
        debug!(code, %revenue, %category, "rate schedule selected");

        ScheduleSelection {
            category,
            schedule: self.schedule(category),
            warning,
        }
    }

    fn category_for(
        &self,
        classification: &CompanyClassification,
        revenue: Decimal,
    ) -> TaxpayerCategory {
        if classification.is_non_profit() {
            TaxpayerCategory::NonProfit
        } else if classification.is_small_business_code()
            && revenue < self.small_business_revenue_ceiling
        {
            TaxpayerCategory::SmallBusiness
        } else {
            TaxpayerCategory::General
        }
    }
}

/// Resolves the rate schedule for `classification_code` and `revenue`.
pub fn select_schedule<'a>(
    tables: &'a RateTables,
    classification_code: &str,
    revenue: Decimal,
) -> ScheduleSelection<'a> {
    tables.select(classification_code, revenue)
}
