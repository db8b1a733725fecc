//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the calculation
//! stages, including rounding and won truncation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Used for reported percentages such as the effective tax rate.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cotax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(11)), dec!(11.00));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Drops fractional won, rounding toward negative infinity.
///
/// Tax amounts are always whole won; for the non-negative values the
/// calculator produces this is plain truncation.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cotax_core::calculations::common::floor_won;
///
/// assert_eq!(floor_won(dec!(20000000.9)), dec!(20000000));
/// assert_eq!(floor_won(dec!(0.4)), dec!(0));
/// ```
pub fn floor_won(value: Decimal) -> Decimal {
    value.floor().normalize()
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cotax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_pads_to_two_places() {
        let result = round_half_up(dec!(11));

        assert_eq!(result.to_string(), "11.00");
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0));

        assert_eq!(result.to_string(), "0.00");
    }

    // =========================================================================
    // floor_won tests
    // =========================================================================

    #[test]
    fn floor_won_discards_fraction() {
        let result = floor_won(dec!(49999999.9));

        assert_eq!(result, dec!(49999999));
    }

    #[test]
    fn floor_won_keeps_whole_values() {
        let result = floor_won(dec!(2000000.00));

        assert_eq!(result.to_string(), "2000000");
    }

    #[test]
    fn floor_won_handles_zero() {
        let result = floor_won(dec!(0.0));

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        let result = max(dec!(100.00), dec!(200.00));

        assert_eq!(result, dec!(200.00));
    }

    #[test]
    fn max_clamps_negative_to_zero() {
        let result = max(dec!(-50.00), Decimal::ZERO);

        assert_eq!(result, Decimal::ZERO);
    }
}
