use serde::{Deserialize, Serialize};

/// One entry of the corporate tax classification code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationCode {
    pub code: &'static str,
    pub name: &'static str,
    pub for_profit: bool,
}

const fn entry(code: &'static str, name: &'static str, for_profit: bool) -> ClassificationCode {
    ClassificationCode {
        code,
        name,
        for_profit,
    }
}

/// Classification codes by legal form and enterprise size.
pub const TAX_CLASSIFICATION_CODES: &[ClassificationCode] = &[
    entry("11", "영리법인(상장법인, 중소기업)", true),
    entry("71", "영리법인(상장법인, 중견기업)", true),
    entry("81", "영리법인(상장법인, 상호출자제한기업)", true),
    entry("91", "영리법인(상장법인, 그외기업)", true),
    entry("21", "영리법인(코스닥상장법인, 중소기업)", true),
    entry("72", "영리법인(코스닥상장법인, 중견기업)", true),
    entry("82", "영리법인(코스닥상장법인, 상호출자제한기업)", true),
    entry("92", "영리법인(코스닥상장법인, 그외기업)", true),
    entry("30", "영리법인(기타법인, 중소기업)", true),
    entry("73", "영리법인(기타법인, 중견기업)", true),
    entry("83", "영리법인(기타법인, 상호출자제한기업)", true),
    entry("93", "영리법인(기타법인, 그외기업)", true),
    entry("60", "비영리법인(중소기업)", false),
    entry("74", "비영리법인(중견기업)", false),
    entry("84", "비영리법인(상호출자제한기업)", false),
    entry("94", "비영리법인(그외기업)", false),
    entry("50", "비영리법인(당기순이익과세)", false),
];

/// Codes taxed on the flat non-profit schedule.
pub const NON_PROFIT_CODES: &[&str] = &["60", "74", "84", "94", "50"];

/// Codes eligible for the small-business schedule below the revenue ceiling.
pub const SMALL_BUSINESS_CODES: &[&str] = &["11", "21", "30", "60"];

/// Looks up a classification code in [`TAX_CLASSIFICATION_CODES`].
pub fn lookup_classification(code: &str) -> Option<&'static ClassificationCode> {
    let code = code.trim();
    TAX_CLASSIFICATION_CODES.iter().find(|c| c.code == code)
}

/// The classification a calculation run is resolved against.
///
/// Owned by the form layer; the calculator only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyClassification {
    pub tax_classification: String,
    #[serde(default)]
    pub corporation_type_code: Option<String>,
}

impl CompanyClassification {
    pub fn new(tax_classification: impl Into<String>) -> Self {
        Self {
            tax_classification: tax_classification.into(),
            corporation_type_code: None,
        }
    }

    pub fn is_known(&self) -> bool {
        lookup_classification(&self.tax_classification).is_some()
    }

    pub fn is_non_profit(&self) -> bool {
        NON_PROFIT_CODES.contains(&self.tax_classification.trim())
    }

    pub fn is_small_business_code(&self) -> bool {
        SMALL_BUSINESS_CODES.contains(&self.tax_classification.trim())
    }
}
