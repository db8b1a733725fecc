//! Tax return assembly.
//!
//! Turns the figures produced by the earlier stages into the immutable
//! [`TaxReturnRecord`] and [`CalculationResults`] snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::CalculationError;
use super::adjustments::AdjustmentTotals;
use super::common::round_half_up;
use crate::{
    AdjustmentItem, CalculationResults, CompanyInfo, Declaration, FinancialInputs,
    FinancialResult, GENERATED_BY, IncomeSection, ReturnAdjustment, TaxReturnRecord, TaxSection,
    TaxSummary, TaxpayerCategory,
};

/// Tax figures computed for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxAmounts {
    pub category: TaxpayerCategory,
    pub corporate_tax: Decimal,
    pub local_income_tax: Decimal,
}

impl TaxAmounts {
    /// Corporate plus local income tax.
    pub fn total(&self) -> Result<Decimal, CalculationError> {
        self.corporate_tax
            .checked_add(self.local_income_tax)
            .ok_or(CalculationError::Overflow("total tax"))
    }
}

/// `(corporate + local) / taxable × 100`, two decimals; zero when nothing is taxable.
pub fn effective_rate(total_tax: Decimal, taxable_income: Decimal) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return round_half_up(Decimal::ZERO);
    }
    round_half_up(total_tax / taxable_income * Decimal::ONE_HUNDRED)
}

/// Builds output snapshots for one company at one point in time.
#[derive(Debug, Clone)]
pub struct TaxReturnAssembler<'a> {
    company: &'a CompanyInfo,
    calculated_at: DateTime<Utc>,
    warnings: Vec<String>,
}

impl<'a> TaxReturnAssembler<'a> {
    pub fn new(company: &'a CompanyInfo, calculated_at: DateTime<Utc>) -> Self {
        Self {
            company,
            calculated_at,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Builds the report-shaped record.
    pub fn assemble(
        &self,
        items: &[AdjustmentItem],
        totals: &AdjustmentTotals,
        amounts: &TaxAmounts,
    ) -> Result<TaxReturnRecord, CalculationError> {
        let date = self.calculated_at.format("%Y%m%d").to_string();
        let total_tax = amounts.total()?;

        Ok(TaxReturnRecord {
            declaration: Declaration {
                company_name: self.company.company_name.clone(),
                company_reg_no: self.company.company_reg_no.clone(),
                business_year: self.company.business_year.clone(),
                tax_classification: self.company.tax_classification.clone(),
                corporation_type_code: self.company.corporation_type_code.clone(),
                report_date: date.clone(),
                calculation_date: date,
            },
            income: IncomeSection {
                book_income: totals.book_income,
                non_deductible_total: totals.non_deductible_total,
                non_taxable_total: totals.non_taxable_total,
                taxable_income: totals.taxable_income,
            },
            tax: TaxSection {
                corporate_tax: amounts.corporate_tax,
                local_income_tax: amounts.local_income_tax,
                total_tax,
                effective_rate: effective_rate(total_tax, totals.taxable_income),
            },
            adjustments: items.iter().map(ReturnAdjustment::from).collect(),
            generated_at: self.calculated_at,
            generated_by: GENERATED_BY.to_string(),
            warnings: self.warnings.clone(),
        })
    }

    /// Builds the on-screen result summary.
    pub fn results(
        &self,
        inputs: &FinancialInputs,
        items: &[AdjustmentItem],
        totals: &AdjustmentTotals,
        amounts: &TaxAmounts,
    ) -> Result<CalculationResults, CalculationError> {
        let total_tax = amounts.total()?;

        Ok(CalculationResults {
            company_info: self.company.clone(),
            category: amounts.category,
            financial_data: FinancialResult {
                revenue: inputs.revenue,
                book_income: inputs.book_income,
                expenses: inputs.expenses,
                taxable_income: totals.taxable_income,
                corporate_tax: amounts.corporate_tax,
                local_income_tax: amounts.local_income_tax,
            },
            tax_adjustments: items.to_vec(),
            summary: TaxSummary {
                taxable_income: totals.taxable_income,
                corporate_tax: amounts.corporate_tax,
                local_income_tax: amounts.local_income_tax,
                total_tax,
                effective_rate: effective_rate(total_tax, totals.taxable_income),
            },
        })
    }
}
