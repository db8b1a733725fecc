//! Standard adjustment codes offered by the data-entry forms.
//!
//! `A` codes are non-deductible add-backs, `B` codes are non-taxable
//! exclusions. Selecting a code fills in the item's name and kind.

use rust_decimal::Decimal;
use serde::Serialize;

use super::adjustment::{AdjustmentError, AdjustmentItem, AdjustmentKind, NewAdjustmentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub kind: AdjustmentKind,
}

const fn non_deductible(
    code: &'static str,
    name: &'static str,
    category: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        code,
        name,
        category,
        kind: AdjustmentKind::NonDeductible,
    }
}

const fn non_taxable(
    code: &'static str,
    name: &'static str,
    category: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        code,
        name,
        category,
        kind: AdjustmentKind::NonTaxable,
    }
}

pub const ADJUSTMENT_CATALOG: &[CatalogEntry] = &[
    non_deductible("A01", "접대비한도초과액", "접대비"),
    non_deductible("A02", "기부금한도초과액", "기부금"),
    non_deductible("A03", "업무무관경비", "업무무관"),
    non_deductible("A04", "법인세법위반과태료", "벌과금"),
    non_deductible("A05", "임원상여한도초과액", "임원급여"),
    non_deductible("A06", "감가상각비한도초과액", "감가상각"),
    non_deductible("A07", "충당금한도초과액", "충당금"),
    non_deductible("A08", "지급이자한도초과액", "지급이자"),
    non_taxable("B01", "수입배당금익금불산입", "배당소득"),
    non_taxable("B02", "국고보조금등익금불산입", "보조금"),
    non_taxable("B03", "보험차익익금불산입", "보험금"),
    non_taxable("B04", "기타익금불산입", "기타"),
];

pub fn lookup_adjustment(code: &str) -> Option<&'static CatalogEntry> {
    let code = code.trim();
    ADJUSTMENT_CATALOG.iter().find(|e| e.code == code)
}

/// Catalog entries of one kind, in code order.
pub fn entries_of_kind(kind: AdjustmentKind) -> impl Iterator<Item = &'static CatalogEntry> {
    ADJUSTMENT_CATALOG.iter().filter(move |e| e.kind == kind)
}

impl AdjustmentItem {
    /// Creates an item from a catalog code, taking its name from the catalog.
    ///
    /// `kind` is the list the user is adding to; a code from the other list
    /// is rejected.
    pub fn from_catalog(
        code: &str,
        kind: AdjustmentKind,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Self, AdjustmentError> {
        let entry = lookup_adjustment(code)
            .ok_or_else(|| AdjustmentError::UnknownCode(code.to_string()))?;

        AdjustmentItem::create(NewAdjustmentItem {
            code: entry.code.to_string(),
            name: entry.name.to_string(),
            kind,
            amount,
            description,
        })
    }
}
