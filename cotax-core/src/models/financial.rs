use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when form input is rejected before a calculation run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field}: '{input}' is not in the expected format")]
    Format { field: &'static str, input: String },

    #[error("{0} is required")]
    Missing(&'static str),
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a won amount typed into a form field.
///
/// Commas are accepted as thousands separators and blank input is 0.
/// Anything else that does not parse, or parses to a negative value, is
/// rejected rather than coerced.
pub fn parse_amount(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let normalized = normalize_amount_input(input);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::warn!(field, input, "invalid amount: {}", e);
        ValidationError::NotANumber {
            field,
            input: input.to_string(),
        }
    })?;

    ensure_non_negative(field, value)
}

pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Figures entered on the financial data form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinancialInputs {
    /// Total revenue for the business year; also drives schedule selection.
    pub revenue: Decimal,
    /// Net income per the financial statements.
    pub book_income: Decimal,
    #[serde(default)]
    pub expenses: Decimal,
}

impl FinancialInputs {
    /// Builds validated inputs from numeric values.
    pub fn new(
        revenue: Decimal,
        book_income: Decimal,
        expenses: Decimal,
    ) -> Result<Self, ValidationError> {
        let inputs = Self {
            revenue,
            book_income,
            expenses,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Builds validated inputs from raw form field text.
    pub fn parse(
        revenue: &str,
        book_income: &str,
        expenses: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            revenue: parse_amount("revenue", revenue)?,
            book_income: parse_amount("book_income", book_income)?,
            expenses: parse_amount("expenses", expenses)?,
        })
    }

    /// Checks that every figure is non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("revenue", self.revenue)?;
        ensure_non_negative("book_income", self.book_income)?;
        ensure_non_negative("expenses", self.expenses)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_accepts_thousands_separator() {
        assert_eq!(parse_amount("revenue", "1,234,567").unwrap(), dec!(1234567));
    }

    #[test]
    fn parse_amount_blank_is_zero() {
        assert_eq!(parse_amount("revenue", "   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_rejects_text() {
        assert_eq!(
            parse_amount("revenue", "abc"),
            Err(ValidationError::NotANumber {
                field: "revenue",
                input: "abc".to_string(),
            })
        );
    }

    #[test]
    fn parse_amount_rejects_negative() {
        assert_eq!(
            parse_amount("book_income", "-5"),
            Err(ValidationError::Negative {
                field: "book_income",
                value: dec!(-5),
            })
        );
    }

    #[test]
    fn new_rejects_negative_expenses() {
        let result = FinancialInputs::new(dec!(100), dec!(50), dec!(-1));

        assert_eq!(
            result,
            Err(ValidationError::Negative {
                field: "expenses",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn parse_builds_inputs() {
        let inputs = FinancialInputs::parse("50,000,000", "20000000", "").unwrap();

        assert_eq!(
            inputs,
            FinancialInputs {
                revenue: dec!(50000000),
                book_income: dec!(20000000),
                expenses: dec!(0),
            }
        );
    }
}
