use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::adjustment_catalog::lookup_adjustment;

/// Direction of a tax adjustment relative to book income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentKind {
    /// Book expense not recognised for tax; added back to income.
    #[serde(rename = "nonDeductible")]
    NonDeductible,
    /// Book income excluded from the tax base; subtracted from income.
    #[serde(rename = "nonTaxable")]
    NonTaxable,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonDeductible => "nonDeductible",
            Self::NonTaxable => "nonTaxable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nonDeductible" | "non_deductible" | "non-deductible" => Some(Self::NonDeductible),
            "nonTaxable" | "non_taxable" | "non-taxable" => Some(Self::NonTaxable),
            _ => None,
        }
    }
}

impl std::fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdjustmentError {
    #[error("adjustment code is required")]
    MissingCode,

    #[error("adjustment name is required")]
    MissingName,

    #[error("adjustment amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("adjustment {code} has negative amount {amount}")]
    NegativeAmount { code: String, amount: Decimal },

    #[error("unknown adjustment code '{0}'")]
    UnknownCode(String),

    #[error("adjustment code {code} is {actual}, not {requested}")]
    KindMismatch {
        code: String,
        requested: AdjustmentKind,
        actual: AdjustmentKind,
    },

    #[error("no adjustment with id {0}")]
    NotFound(Uuid),
}

/// A single add-back or subtract line entered by the user.
///
/// Items are immutable once created; an edit removes the item and adds a
/// new one with a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentItem {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// For creating new adjustment items (no id).
///
/// `name` may be left blank for catalog codes; the catalog name is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdjustmentItem {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

impl AdjustmentItem {
    /// Creates an item from form input, assigning it a new id.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustmentError`] if the code is blank, a catalog code is
    /// used with the other kind, the name is blank for a code outside the
    /// catalog, or the amount is not strictly positive.
    pub fn create(new: NewAdjustmentItem) -> Result<Self, AdjustmentError> {
        let code = new.code.trim().to_string();
        if code.is_empty() {
            return Err(AdjustmentError::MissingCode);
        }

        let catalog_entry = lookup_adjustment(&code);
        if let Some(entry) = catalog_entry {
            if entry.kind != new.kind {
                return Err(AdjustmentError::KindMismatch {
                    code,
                    requested: new.kind,
                    actual: entry.kind,
                });
            }
        }

        let name = match (new.name.trim(), catalog_entry) {
            ("", Some(entry)) => entry.name.to_string(),
            ("", None) => return Err(AdjustmentError::MissingName),
            (name, _) => name.to_string(),
        };
        if new.amount <= Decimal::ZERO {
            return Err(AdjustmentError::NonPositiveAmount(new.amount));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            code,
            name,
            kind: new.kind,
            amount: new.amount,
            description: new
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }

    pub fn is_non_deductible(&self) -> bool {
        self.kind == AdjustmentKind::NonDeductible
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn new_item() -> NewAdjustmentItem {
        NewAdjustmentItem {
            code: "A01".to_string(),
            name: "접대비한도초과액".to_string(),
            kind: AdjustmentKind::NonDeductible,
            amount: dec!(1500000),
            description: Some("  ".to_string()),
        }
    }

    #[test]
    fn create_assigns_id_and_drops_blank_description() {
        let item = AdjustmentItem::create(new_item()).unwrap();

        assert_eq!(item.code, "A01");
        assert_eq!(item.amount, dec!(1500000));
        assert_eq!(item.description, None);
        assert!(item.is_non_deductible());
    }

    #[test]
    fn create_gives_distinct_ids() {
        let a = AdjustmentItem::create(new_item()).unwrap();
        let b = AdjustmentItem::create(new_item()).unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_rejects_blank_code() {
        let mut new = new_item();
        new.code = " ".to_string();

        assert_eq!(
            AdjustmentItem::create(new),
            Err(AdjustmentError::MissingCode)
        );
    }

    #[test]
    fn create_rejects_blank_name_outside_catalog() {
        let mut new = new_item();
        new.code = "X01".to_string();
        new.name = String::new();

        assert_eq!(
            AdjustmentItem::create(new),
            Err(AdjustmentError::MissingName)
        );
    }

    #[test]
    fn create_takes_blank_name_from_catalog() {
        let mut new = new_item();
        new.name = " ".to_string();

        let item = AdjustmentItem::create(new).unwrap();

        assert_eq!(item.name, "접대비한도초과액");
    }

    #[test]
    fn create_keeps_custom_code_with_name() {
        let mut new = new_item();
        new.code = "X01".to_string();
        new.name = "기타손금불산입".to_string();

        let item = AdjustmentItem::create(new).unwrap();

        assert_eq!(item.code, "X01");
        assert_eq!(item.name, "기타손금불산입");
    }

    #[test]
    fn create_rejects_catalog_code_of_other_kind() {
        let mut new = new_item();
        new.kind = AdjustmentKind::NonTaxable;

        assert_eq!(
            AdjustmentItem::create(new),
            Err(AdjustmentError::KindMismatch {
                code: "A01".to_string(),
                requested: AdjustmentKind::NonTaxable,
                actual: AdjustmentKind::NonDeductible,
            })
        );
    }

    #[test]
    fn create_rejects_zero_amount() {
        let mut new = new_item();
        new.amount = dec!(0);

        assert_eq!(
            AdjustmentItem::create(new),
            Err(AdjustmentError::NonPositiveAmount(dec!(0)))
        );
    }

    #[test]
    fn new_item_deserializes_without_name() {
        let new: NewAdjustmentItem =
            serde_json::from_str(r#"{"code":"B01","type":"nonTaxable","amount":"10"}"#).unwrap();

        assert_eq!(new.name, "");
        assert_eq!(new.amount, dec!(10));
    }

    #[test]
    fn kind_serializes_with_form_names() {
        let json = serde_json::to_string(&AdjustmentKind::NonTaxable).unwrap();

        assert_eq!(json, "\"nonTaxable\"");
    }

    #[test]
    fn kind_parse_accepts_spellings() {
        assert_eq!(
            AdjustmentKind::parse("non-deductible"),
            Some(AdjustmentKind::NonDeductible)
        );
        assert_eq!(
            AdjustmentKind::parse("nonTaxable"),
            Some(AdjustmentKind::NonTaxable)
        );
        assert_eq!(AdjustmentKind::parse("other"), None);
    }
}
