//! Corporate tax calculation stages.
//!
//! The stages are plain functions over immutable values and can be used on
//! their own; [`CorporateTaxCalculation`] chains them into one run.

mod adjustments;
mod assembler;
mod brackets;
pub mod common;
mod limits;
mod pipeline;
mod schedules;
mod surtax;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AdjustmentError, ValidationError};

pub use adjustments::{AdjustmentTotals, aggregate, aggregate_totals, total_of_kind};
pub use assembler::{TaxAmounts, TaxReturnAssembler, effective_rate};
pub use brackets::compute_tax;
pub use limits::{
    AdjustmentLimits, donation_limit, entertainment_limit, excess_over_limit,
    executive_bonus_limit,
};
pub use pipeline::{
    CalculationOutcome, CalculationRequest, CorporateTaxCalculation, NewCalculationRequest,
};
pub use schedules::{
    ClassificationWarning, RateTables, SMALL_BUSINESS_REVENUE_CEILING, ScheduleSelection,
    select_schedule,
};
pub use surtax::{LOCAL_INCOME_TAX_RATE, local_income_tax};

/// Errors that stop a calculation run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A financial figure failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// An adjustment item could not be applied.
    #[error("invalid adjustment: {0}")]
    Adjustment(#[from] AdjustmentError),

    #[error("taxable income must not be negative, got {0}")]
    NegativeTaxableIncome(Decimal),

    /// An intermediate amount left the range of [`Decimal`].
    #[error("{0} is too large to calculate")]
    Overflow(&'static str),
}
