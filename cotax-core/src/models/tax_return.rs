use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::adjustment::{AdjustmentItem, AdjustmentKind};
use super::company::CompanyInfo;
use super::tax_bracket::TaxpayerCategory;

pub const GENERATED_BY: &str = "CoTax System v1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub company_name: String,
    pub company_reg_no: String,
    pub business_year: String,
    pub tax_classification: String,
    pub corporation_type_code: Option<String>,
    /// `YYYYMMDD`
    pub report_date: String,
    /// `YYYYMMDD`
    pub calculation_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSection {
    pub book_income: Decimal,
    pub non_deductible_total: Decimal,
    pub non_taxable_total: Decimal,
    pub taxable_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSection {
    pub corporate_tax: Decimal,
    pub local_income_tax: Decimal,
    pub total_tax: Decimal,
    /// Percentage with two decimal places.
    pub effective_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnAdjustment {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub amount: Decimal,
    pub description: String,
}

impl From<&AdjustmentItem> for ReturnAdjustment {
    fn from(item: &AdjustmentItem) -> Self {
        Self {
            code: item.code.clone(),
            name: item.name.clone(),
            kind: item.kind,
            amount: item.amount,
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

/// Write-once output of a calculation run, shaped like the filed return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturnRecord {
    pub declaration: Declaration,
    pub income: IncomeSection,
    pub tax: TaxSection,
    pub adjustments: Vec<ReturnAdjustment>,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Derived figures of a run, alongside the inputs they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialResult {
    pub revenue: Decimal,
    pub book_income: Decimal,
    pub expenses: Decimal,
    pub taxable_income: Decimal,
    pub corporate_tax: Decimal,
    pub local_income_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub taxable_income: Decimal,
    pub corporate_tax: Decimal,
    pub local_income_tax: Decimal,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
}

/// Full result of a run as shown on the calculation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResults {
    pub company_info: CompanyInfo,
    pub category: TaxpayerCategory,
    pub financial_data: FinancialResult,
    pub tax_adjustments: Vec<AdjustmentItem>,
    pub summary: TaxSummary,
}
