use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taxpayer category a [`RateSchedule`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxpayerCategory {
    General,
    SmallBusiness,
    NonProfit,
}

impl TaxpayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::SmallBusiness => "small_business",
            Self::NonProfit => "non_profit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Self::General),
            "small_business" | "small" => Some(Self::SmallBusiness),
            "non_profit" | "nonprofit" => Some(Self::NonProfit),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaxpayerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous range of taxable income taxed at a single marginal rate.
///
/// Bounds are whole won and inclusive. A bracket with `lower_bound > 0`
/// starts one won above the previous bracket's `upper_bound`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(lower_bound: Decimal, upper_bound: Option<Decimal>, rate: Decimal) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Income already covered by the brackets below this one.
    pub fn floor(&self) -> Decimal {
        if self.lower_bound > Decimal::ZERO {
            self.lower_bound - Decimal::ONE
        } else {
            Decimal::ZERO
        }
    }

    /// Amount of income this bracket taxes, or `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.floor())
    }

    /// Whether `income` falls inside this bracket.
    pub fn contains(&self, income: Decimal) -> bool {
        income > self.floor() && self.upper_bound.is_none_or(|upper| income <= upper)
    }
}

/// Errors raised when a rate schedule violates its structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{category} schedule has no brackets")]
    Empty { category: TaxpayerCategory },

    #[error("{category} schedule must start at 0, first bracket starts at {lower_bound}")]
    DoesNotStartAtZero {
        category: TaxpayerCategory,
        lower_bound: Decimal,
    },

    #[error("{category} bracket {index}: bounds must be whole won")]
    FractionalBound {
        category: TaxpayerCategory,
        index: usize,
    },

    #[error("{category} bracket {index}: upper bound {upper_bound} is below lower bound {lower_bound}")]
    InvertedBounds {
        category: TaxpayerCategory,
        index: usize,
        lower_bound: Decimal,
        upper_bound: Decimal,
    },

    #[error("{category} bracket {index}: expected lower bound {expected}, found {found}")]
    NotContiguous {
        category: TaxpayerCategory,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{category} bracket {index}: upper bound is too large to continue from")]
    BoundTooLarge {
        category: TaxpayerCategory,
        index: usize,
    },

    #[error("{category} bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd {
        category: TaxpayerCategory,
        index: usize,
    },

    #[error("{category} schedule: last bracket must be unbounded")]
    BoundedTop { category: TaxpayerCategory },

    #[error("{category} bracket {index}: rate {rate} is outside [0, 1]")]
    InvalidRate {
        category: TaxpayerCategory,
        index: usize,
        rate: Decimal,
    },

    #[error("schedule for {found} supplied where {expected} was expected")]
    CategoryMismatch {
        expected: TaxpayerCategory,
        found: TaxpayerCategory,
    },
}

/// An ordered, validated sequence of [`TaxBracket`]s for one category.
///
/// The only way to obtain a schedule is [`RateSchedule::new`], so every
/// instance is contiguous, ascending and open-ended at the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSchedule {
    category: TaxpayerCategory,
    brackets: Vec<TaxBracket>,
}

impl RateSchedule {
    /// Validates `brackets` and wraps them in a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if the brackets are empty, do not start at
    /// zero, leave gaps or overlaps, have fractional bounds, carry a rate
    /// outside `[0, 1]`, or the last bracket is bounded.
    pub fn new(
        category: TaxpayerCategory,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, ScheduleError> {
        validate_brackets(category, &brackets)?;
        Ok(Self { category, brackets })
    }

    pub fn category(&self) -> TaxpayerCategory {
        self.category
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// The bracket whose range contains `income` (the first bracket for 0).
    pub fn bracket_for(&self, income: Decimal) -> Option<&TaxBracket> {
        if income <= Decimal::ZERO {
            return self.brackets.first();
        }
        self.brackets.iter().find(|b| b.contains(income))
    }
}

fn validate_brackets(
    category: TaxpayerCategory,
    brackets: &[TaxBracket],
) -> Result<(), ScheduleError> {
    let first = brackets.first().ok_or(ScheduleError::Empty { category })?;
    if first.lower_bound != Decimal::ZERO {
        return Err(ScheduleError::DoesNotStartAtZero {
            category,
            lower_bound: first.lower_bound,
        });
    }

    let last_index = brackets.len() - 1;
    let mut expected_lower = Decimal::ZERO;
    let fractional = |value: Decimal| value.fract() != Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ScheduleError::InvalidRate {
                category,
                index,
                rate: bracket.rate,
            });
        }
        if fractional(bracket.lower_bound) || bracket.upper_bound.is_some_and(fractional) {
            return Err(ScheduleError::FractionalBound { category, index });
        }
        if bracket.lower_bound != expected_lower {
            return Err(ScheduleError::NotContiguous {
                category,
                index,
                expected: expected_lower,
                found: bracket.lower_bound,
            });
        }

        match bracket.upper_bound {
            Some(upper) => {
                if upper < bracket.lower_bound {
                    return Err(ScheduleError::InvertedBounds {
                        category,
                        index,
                        lower_bound: bracket.lower_bound,
                        upper_bound: upper,
                    });
                }
                if index == last_index {
                    return Err(ScheduleError::BoundedTop { category });
                }
                expected_lower = upper
                    .checked_add(Decimal::ONE)
                    .ok_or(ScheduleError::BoundTooLarge { category, index })?;
            }
            None if index != last_index => {
                return Err(ScheduleError::UnboundedBeforeEnd { category, index });
            }
            None => {}
        }
    }

    Ok(())
}
