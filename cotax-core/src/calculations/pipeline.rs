//! End-to-end corporate tax calculation.
//!
//! Each stage takes the previous stage's output by value or reference and
//! returns a new value; nothing is mutated along the way:
//!
//! | Stage | Input                              | Output              |
//! |-------|------------------------------------|---------------------|
//! | 1     | financial inputs                   | validated inputs    |
//! | 2     | classification code, revenue       | rate schedule       |
//! | 3     | book income, adjustment items      | adjustment totals   |
//! | 4     | taxable income, rate schedule      | corporate tax       |
//! | 5     | corporate tax                      | local income tax    |
//! | 6     | everything above                   | tax return record   |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cotax_core::calculations::{CalculationRequest, CorporateTaxCalculation, RateTables};
//! use cotax_core::{CompanyInfo, FinancialInputs};
//!
//! let tables = RateTables::builtin().unwrap();
//! let request = CalculationRequest {
//!     company: CompanyInfo {
//!         company_name: "테스트".to_string(),
//!         tax_classification: "30".to_string(),
//!         ..Default::default()
//!     },
//!     inputs: FinancialInputs {
//!         revenue: dec!(50000000),
//!         book_income: dec!(20000000),
//!         expenses: dec!(0),
//!     },
//!     adjustments: Vec::new(),
//! };
//!
//! let outcome = CorporateTaxCalculation::new(&tables).calculate(&request).unwrap();
//!
//! assert_eq!(outcome.tax_return.tax.total_tax, dec!(2200000));
//! assert_eq!(outcome.tax_return.tax.effective_rate.to_string(), "11.00");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CalculationError;
use super::adjustments::aggregate_totals;
use super::assembler::{TaxAmounts, TaxReturnAssembler};
use super::brackets::compute_tax;
use super::schedules::RateTables;
use super::surtax::local_income_tax;
use crate::{
    AdjustmentError, AdjustmentItem, CalculationResults, CompanyInfo, FinancialInputs,
    NewAdjustmentItem, TaxReturnRecord,
};

/// Everything one calculation run needs from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CalculationRequest {
    pub company: CompanyInfo,
    pub inputs: FinancialInputs,
    pub adjustments: Vec<AdjustmentItem>,
}

/// A calculation request as written in a request file.
///
/// Adjustment items carry no id; [`NewCalculationRequest::into_request`]
/// validates each one and assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NewCalculationRequest {
    pub company: CompanyInfo,
    pub inputs: FinancialInputs,
    #[serde(default)]
    pub adjustments: Vec<NewAdjustmentItem>,
}

impl NewCalculationRequest {
    /// # Errors
    ///
    /// Returns the first [`AdjustmentError`] raised by [`AdjustmentItem::create`].
    pub fn into_request(self) -> Result<CalculationRequest, AdjustmentError> {
        let adjustments = self
            .adjustments
            .into_iter()
            .map(AdjustmentItem::create)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CalculationRequest {
            company: self.company,
            inputs: self.inputs,
            adjustments,
        })
    }
}

/// The two snapshots a run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub results: CalculationResults,
    pub tax_return: TaxReturnRecord,
}

/// A calculation context bound to one set of rate tables.
///
/// Construct one per request; it holds no state besides the borrowed tables.
#[derive(Debug, Clone, Copy)]
pub struct CorporateTaxCalculation<'a> {
    tables: &'a RateTables,
}

impl<'a> CorporateTaxCalculation<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a RateTables {
        self.tables
    }

    /// Runs the pipeline stamped with the current time.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationOutcome, CalculationError> {
        self.calculate_at(request, Utc::now())
    }

    /// Runs the pipeline stamped with `calculated_at`.
    ///
    /// Identical requests and timestamps always produce identical outcomes.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::InvalidInput`] for negative financial figures.
    /// * [`CalculationError::Adjustment`] for an item with a negative amount.
    /// * [`CalculationError::Overflow`] if a total leaves the decimal range.
    pub fn calculate_at(
        &self,
        request: &CalculationRequest,
        calculated_at: DateTime<Utc>,
    ) -> Result<CalculationOutcome, CalculationError> {
        let inputs = &request.inputs;
        inputs.validate()?;

        let classification = request.company.classification();
        let selection = self.tables.select_for(&classification, inputs.revenue);

        let totals = aggregate_totals(inputs.book_income, &request.adjustments)?;
        debug!(
            book_income = %totals.book_income,
            non_deductible = %totals.non_deductible_total,
            non_taxable = %totals.non_taxable_total,
            taxable_income = %totals.taxable_income,
            "adjustments applied"
        );

        let corporate_tax = compute_tax(totals.taxable_income, selection.schedule)?;
        let amounts = TaxAmounts {
            category: selection.category,
            corporate_tax,
            local_income_tax: local_income_tax(corporate_tax),
        };
        debug!(
            category = %amounts.category,
            corporate_tax = %amounts.corporate_tax,
            local_income_tax = %amounts.local_income_tax,
            "tax computed"
        );

        let warnings = selection.warning.iter().map(ToString::to_string).collect();
        let assembler =
            TaxReturnAssembler::new(&request.company, calculated_at).with_warnings(warnings);

        Ok(CalculationOutcome {
            results: assembler.results(inputs, &request.adjustments, &totals, &amounts)?,
            tax_return: assembler.assemble(&request.adjustments, &totals, &amounts)?,
        })
    }
}
