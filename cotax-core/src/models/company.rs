use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::classification::CompanyClassification;
use super::financial::ValidationError;

static COMPANY_REG_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}-\d{7}$").expect("valid company_reg_no pattern"));
static BUSINESS_REG_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{5}$").expect("valid business_reg_no pattern"));
static BUSINESS_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").expect("valid business_year pattern"));

/// Company master data merged with its tax classification record.
///
/// Field names match the stored form records so the struct can be read
/// straight out of either of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub company_name: String,
    pub company_reg_no: String,
    pub business_reg_no: String,
    pub business_year: String,
    pub ceo_name: String,
    pub tax_classification: String,
    pub corporation_type_code: Option<String>,
}

impl CompanyInfo {
    pub fn classification(&self) -> CompanyClassification {
        CompanyClassification {
            tax_classification: self.tax_classification.trim().to_string(),
            corporation_type_code: self.corporation_type_code.clone(),
        }
    }

    /// Checks the identifying fields entered on the company master form.
    ///
    /// Empty registration numbers are allowed; anything entered must match
    /// the official layout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::Missing("company_name"));
        }
        check_format("company_reg_no", &self.company_reg_no, &COMPANY_REG_NO)?;
        check_format("business_reg_no", &self.business_reg_no, &BUSINESS_REG_NO)?;
        check_format("business_year", &self.business_year, &BUSINESS_YEAR)?;
        Ok(())
    }
}

fn check_format(field: &'static str, value: &str, pattern: &Regex) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || pattern.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Format {
            field,
            input: value.to_string(),
        })
    }
}
