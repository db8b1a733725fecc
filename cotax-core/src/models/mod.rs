mod adjustment;
mod adjustment_catalog;
mod classification;
mod company;
mod financial;
mod tax_bracket;
mod tax_return;

pub use adjustment::{AdjustmentError, AdjustmentItem, AdjustmentKind, NewAdjustmentItem};
pub use adjustment_catalog::{ADJUSTMENT_CATALOG, CatalogEntry, entries_of_kind, lookup_adjustment};
pub use classification::{
    ClassificationCode, CompanyClassification, NON_PROFIT_CODES, SMALL_BUSINESS_CODES,
    TAX_CLASSIFICATION_CODES, lookup_classification,
};
pub use company::CompanyInfo;
pub use financial::{FinancialInputs, ValidationError, parse_amount};
pub use tax_bracket::{RateSchedule, ScheduleError, TaxBracket, TaxpayerCategory};
pub use tax_return::{
    CalculationResults, Declaration, FinancialResult, GENERATED_BY, IncomeSection,
    ReturnAdjustment, TaxReturnRecord, TaxSection, TaxSummary,
};
