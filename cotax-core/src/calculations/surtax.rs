//! Local income tax levied on top of the corporate tax.

use rust_decimal::Decimal;

use super::common::floor_won;

/// Local income tax rate as a fraction of corporate tax (10%).
pub const LOCAL_INCOME_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// `floor(corporate_tax × 10%)`
pub fn local_income_tax(corporate_tax: Decimal) -> Decimal {
    floor_won(corporate_tax * LOCAL_INCOME_TAX_RATE)
}
