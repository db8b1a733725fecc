//! Adjustment aggregation: book income to taxable income.
//!
//! ```text
//! taxable income = max(0, book income + Σ non-deductible − Σ non-taxable)
//! ```
//!
//! Sums use exact decimal arithmetic, so the order of items never changes
//! the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CalculationError;
use super::common::max;
use crate::{AdjustmentError, AdjustmentItem, AdjustmentKind, ValidationError};

/// Per-kind totals and the taxable income they produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentTotals {
    pub book_income: Decimal,
    pub non_deductible_total: Decimal,
    pub non_taxable_total: Decimal,
    pub taxable_income: Decimal,
}

/// Sums item amounts of one kind.
///
/// # Errors
///
/// * [`CalculationError::Adjustment`] for the first item with a negative
///   amount, whatever its kind.
/// * [`CalculationError::Overflow`] if the sum leaves the decimal range.
pub fn total_of_kind(
    items: &[AdjustmentItem],
    kind: AdjustmentKind,
) -> Result<Decimal, CalculationError> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        check_item(item)?;
        if item.kind != kind {
            return Ok(sum);
        }
        sum.checked_add(item.amount)
            .ok_or(CalculationError::Overflow("adjustment total"))
    })
}

fn check_item(item: &AdjustmentItem) -> Result<(), AdjustmentError> {
    if item.amount < Decimal::ZERO {
        return Err(AdjustmentError::NegativeAmount {
            code: item.code.clone(),
            amount: item.amount,
        });
    }
    Ok(())
}

/// Applies `items` to `book_income` and returns the full breakdown.
///
/// # Errors
///
/// * [`CalculationError::InvalidInput`] if `book_income` is negative.
/// * [`CalculationError::Adjustment`] if any item has a negative amount.
/// * [`CalculationError::Overflow`] if a total leaves the decimal range.
pub fn aggregate_totals(
    book_income: Decimal,
    items: &[AdjustmentItem],
) -> Result<AdjustmentTotals, CalculationError> {
    if book_income < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "book_income",
            value: book_income,
        }
        .into());
    }

    let non_deductible_total = total_of_kind(items, AdjustmentKind::NonDeductible)?;
    let non_taxable_total = total_of_kind(items, AdjustmentKind::NonTaxable)?;
    let adjusted_income = book_income
        .checked_add(non_deductible_total)
        .and_then(|income| income.checked_sub(non_taxable_total))
        .ok_or(CalculationError::Overflow("taxable income"))?;

    Ok(AdjustmentTotals {
        book_income,
        non_deductible_total,
        non_taxable_total,
        taxable_income: max(adjusted_income, Decimal::ZERO),
    })
}

/// Returns the taxable income for `book_income` after `items`, floored at zero.
pub fn aggregate(
    book_income: Decimal,
    items: &[AdjustmentItem],
) -> Result<Decimal, CalculationError> {
    aggregate_totals(book_income, items).map(|totals| totals.taxable_income)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn item(code: &str, kind: AdjustmentKind, amount: Decimal) -> AdjustmentItem {
        AdjustmentItem::from_catalog(code, kind, amount, None).unwrap()
    }

    fn mixed_items() -> Vec<AdjustmentItem> {
        vec![
            item("A01", AdjustmentKind::NonDeductible, dec!(1200000)),
            item("B01", AdjustmentKind::NonTaxable, dec!(300000.5)),
            item("A04", AdjustmentKind::NonDeductible, dec!(0.25)),
            item("B04", AdjustmentKind::NonTaxable, dec!(700000)),
        ]
    }

    #[test]
    fn no_items_leaves_book_income() {
        let result = aggregate(dec!(20000000), &[]);

        assert_eq!(result, Ok(dec!(20000000)));
    }

    #[test]
    fn adds_non_deductible_and_subtracts_non_taxable() {
        let totals = aggregate_totals(dec!(10000000), &mixed_items()).unwrap();

        assert_eq!(
            totals,
            AdjustmentTotals {
                book_income: dec!(10000000),
                non_deductible_total: dec!(1200000.25),
                non_taxable_total: dec!(1000000.5),
                taxable_income: dec!(10199999.75),
            }
        );
    }

    #[test]
    fn result_is_independent_of_item_order() {
        let items = mixed_items();
        let expected = aggregate(dec!(5000000), &items).unwrap();

        let mut reversed = items.clone();
        reversed.reverse();
        let mut rotated = items.clone();
        rotated.rotate_left(1);
        let mut swapped = items;
        swapped.swap(0, 3);

        for permutation in [reversed, rotated, swapped] {
            assert_eq!(aggregate(dec!(5000000), &permutation), Ok(expected));
        }
    }

    #[test]
    fn clamps_to_zero_when_exclusions_exceed_income() {
        let items = vec![
            item("A02", AdjustmentKind::NonDeductible, dec!(100)),
            item("B02", AdjustmentKind::NonTaxable, dec!(5000)),
        ];

        let totals = aggregate_totals(dec!(0), &items).unwrap();

        assert_eq!(totals.taxable_income, dec!(0));
        assert_eq!(totals.non_taxable_total, dec!(5000));
    }

    #[test]
    fn rejects_negative_item_amount() {
        let mut items = mixed_items();
        items[2].amount = dec!(-10);

        let result = aggregate(dec!(100), &items);

        assert_eq!(
            result,
            Err(CalculationError::Adjustment(AdjustmentError::NegativeAmount {
                code: "A04".to_string(),
                amount: dec!(-10),
            }))
        );
    }

    #[test]
    fn rejects_negative_book_income() {
        let result = aggregate(dec!(-1), &[]);

        assert_eq!(
            result,
            Err(CalculationError::InvalidInput(ValidationError::Negative {
                field: "book_income",
                value: dec!(-1),
            }))
        );
    }

    #[test]
    fn total_of_kind_sums_only_that_kind() {
        let result = total_of_kind(&mixed_items(), AdjustmentKind::NonTaxable);

        assert_eq!(result, Ok(dec!(1000000.5)));
    }
    #[test]
    fn rejects_taxable_income_beyond_decimal_range() {
        let items = vec![item("A01", AdjustmentKind::NonDeductible, Decimal::MAX)];

        let result = aggregate(Decimal::MAX, &items);

        assert_eq!(result, Err(CalculationError::Overflow("taxable income")));
    }

    #[test]
    fn total_of_kind_rejects_sum_beyond_decimal_range() {
        let items = vec![
            item("A01", AdjustmentKind::NonDeductible, Decimal::MAX),
            item("A02", AdjustmentKind::NonDeductible, dec!(1)),
        ];

        let result = total_of_kind(&items, AdjustmentKind::NonDeductible);

        assert_eq!(result, Err(CalculationError::Overflow("adjustment total")));
    }
}
