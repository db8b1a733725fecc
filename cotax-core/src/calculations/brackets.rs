//! Progressive bracket tax engine.
//!
//! Taxable income is consumed bracket by bracket from the bottom of the
//! schedule. Each bracket taxes the slice of income that falls inside it at
//! its own marginal rate:
//!
//! | Bracket | Range (won)                      | Slice taxed                     |
//! |---------|----------------------------------|---------------------------------|
//! | first   | `0 ..= upper`                    | `min(income, upper)`            |
//! | later   | `lower ..= upper`                | `min(remaining, upper-lower+1)` |
//! | top     | `lower ..`                       | everything that remains         |
//!
//! The sum of `slice × rate` is truncated to whole won.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cotax_core::calculations::{RateTables, compute_tax};
//! use cotax_core::TaxpayerCategory;
//!
//! let tables = RateTables::builtin().unwrap();
//! let general = tables.schedule(TaxpayerCategory::General);
//!
//! // 200,000,000 × 10% + 150,000,000 × 20%
//! assert_eq!(compute_tax(dec!(350000000), general), Ok(dec!(50000000)));
//! ```

use rust_decimal::Decimal;

use super::CalculationError;
use super::common::floor_won;
use crate::RateSchedule;

/// Applies `schedule` to `taxable_income` and returns the tax in whole won.
///
/// # Errors
///
/// Returns [`CalculationError::NegativeTaxableIncome`] for negative input;
/// callers clamp taxable income to zero before getting here.
pub fn compute_tax(
    taxable_income: Decimal,
    schedule: &RateSchedule,
) -> Result<Decimal, CalculationError> {
    if taxable_income < Decimal::ZERO {
        return Err(CalculationError::NegativeTaxableIncome(taxable_income));
    }

    Ok(floor_won(marginal_tax(taxable_income, schedule)))
}

/// Untruncated bracket sum; exposed to the crate for marginal-rate checks.
pub(crate) fn marginal_tax(taxable_income: Decimal, schedule: &RateSchedule) -> Decimal {
    let mut remaining = taxable_income;
    let mut tax = Decimal::ZERO;

    for bracket in schedule.brackets() {
        if remaining <= Decimal::ZERO {
            break;
        }

        let slice = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        tax += slice * bracket.rate;
        remaining -= slice;
    }

    tax
}
