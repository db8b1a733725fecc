//! Reference limits used when preparing adjustment items.
//!
//! These are the amounts a company may deduct before the excess becomes a
//! non-deductible add-back. They are simplified illustrations of the
//! statutory limits and only feed the adjustment screen; the calculation
//! pipeline never applies them on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{floor_won, max};

const ENTERTAINMENT_BASE: i64 = 12_000_000;
const ENTERTAINMENT_CAP: i64 = 32_000_000;
const ENTERTAINMENT_LOW_REVENUE: i64 = 10_000_000_000;
const ENTERTAINMENT_HIGH_REVENUE: i64 = 50_000_000_000;

/// Entertainment expense limit for a given revenue.
///
/// | Revenue              | Limit                                        |
/// |----------------------|----------------------------------------------|
/// | ≤ 100억              | smaller of 1,200만 and revenue × 3%           |
/// | ≤ 500억              | 1,200만 + (revenue − 100억) × 0.5%            |
/// | above                | 3,200만                                       |
pub fn entertainment_limit(revenue: Decimal) -> Decimal {
    let base = Decimal::from(ENTERTAINMENT_BASE);
    let low = Decimal::from(ENTERTAINMENT_LOW_REVENUE);

    if revenue <= low {
        base.min(revenue * Decimal::new(3, 2))
    } else if revenue <= Decimal::from(ENTERTAINMENT_HIGH_REVENUE) {
        base + (revenue - low) * Decimal::new(5, 3)
    } else {
        Decimal::from(ENTERTAINMENT_CAP)
    }
}

/// Donation limit: 10% of taxable income.
pub fn donation_limit(taxable_income: Decimal) -> Decimal {
    taxable_income * Decimal::new(10, 2)
}

/// Executive bonus limit: 70% of total salary.
pub fn executive_bonus_limit(total_salary: Decimal) -> Decimal {
    total_salary * Decimal::new(70, 2)
}

/// The part of `actual` above `limit`, i.e. the amount to add back.
pub fn excess_over_limit(actual: Decimal, limit: Decimal) -> Decimal {
    max(actual - limit, Decimal::ZERO)
}

/// All reference limits for one company, in whole won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentLimits {
    pub revenue: Decimal,
    pub entertainment_limit: Decimal,
    pub donation_limit: Option<Decimal>,
    pub executive_bonus_limit: Option<Decimal>,
}

impl AdjustmentLimits {
    /// Computes every limit that the given figures allow.
    ///
    /// The donation limit depends on the final taxable income and the bonus
    /// limit on total salary; each is omitted when its input is unknown.
    pub fn compute(
        revenue: Decimal,
        total_salary: Option<Decimal>,
        taxable_income: Option<Decimal>,
    ) -> Self {
        Self {
            revenue,
            entertainment_limit: floor_won(entertainment_limit(revenue)),
            donation_limit: taxable_income.map(|income| floor_won(donation_limit(income))),
            executive_bonus_limit: total_salary
                .filter(|salary| *salary > Decimal::ZERO)
                .map(|salary| floor_won(executive_bonus_limit(salary))),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // entertainment_limit tests
    // =========================================================================

    #[test]
    fn entertainment_small_revenue_uses_three_percent() {
        assert_eq!(entertainment_limit(dec!(100000000)), dec!(3000000));
    }

    #[test]
    fn entertainment_small_revenue_capped_at_base() {
        assert_eq!(entertainment_limit(dec!(1000000000)), dec!(12000000));
    }

    #[test]
    fn entertainment_middle_band() {
        // 12,000,000 + 10,000,000,000 × 0.005
        assert_eq!(entertainment_limit(dec!(20000000000)), dec!(62000000));
    }

    #[test]
    fn entertainment_at_low_boundary() {
        assert_eq!(entertainment_limit(dec!(10000000000)), dec!(12000000));
    }

    #[test]
    fn entertainment_above_high_boundary_is_capped() {
        assert_eq!(entertainment_limit(dec!(50000000001)), dec!(32000000));
    }

    // =========================================================================
    // other limits
    // =========================================================================

    #[test]
    fn donation_limit_is_ten_percent() {
        assert_eq!(donation_limit(dec!(350000000)), dec!(35000000));
    }

    #[test]
    fn executive_bonus_limit_is_seventy_percent() {
        assert_eq!(executive_bonus_limit(dec!(100000000)), dec!(70000000));
    }

    #[test]
    fn excess_is_zero_when_under_limit() {
        assert_eq!(excess_over_limit(dec!(1000), dec!(5000)), dec!(0));
        assert_eq!(excess_over_limit(dec!(7000), dec!(5000)), dec!(2000));
    }

    #[test]
    fn compute_omits_unknown_limits() {
        let limits = AdjustmentLimits::compute(dec!(100000000), Some(dec!(0)), None);

        assert_eq!(
            limits,
            AdjustmentLimits {
                revenue: dec!(100000000),
                entertainment_limit: dec!(3000000),
                donation_limit: None,
                executive_bonus_limit: None,
            }
        );
    }

    #[test]
    fn compute_fills_every_limit() {
        let limits =
            AdjustmentLimits::compute(dec!(100000001), Some(dec!(10000001)), Some(dec!(55)));

        assert_eq!(limits.entertainment_limit, dec!(3000000));
        assert_eq!(limits.executive_bonus_limit, Some(dec!(7000000)));
        assert_eq!(limits.donation_limit, Some(dec!(5)));
    }
}
