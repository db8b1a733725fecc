//! Per-session list of adjustment items being edited.

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::calculations::{CalculationError, total_of_kind};
use crate::{AdjustmentError, AdjustmentItem, AdjustmentKind, NewAdjustmentItem};

/// Ordered adjustment items owned by one editing session.
///
/// Items keep insertion order. Replacing an item drops the old one and
/// appends a newly created item with its own id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentWorkingSet {
    items: Vec<AdjustmentItem>,
}

impl AdjustmentWorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from previously saved items.
    pub fn from_items(items: Vec<AdjustmentItem>) -> Self {
        Self { items }
    }

    /// Validates and appends a new item, returning its id.
    pub fn add(&mut self, new: NewAdjustmentItem) -> Result<Uuid, AdjustmentError> {
        let item = AdjustmentItem::create(new)?;
        Ok(self.push(item))
    }

    /// Appends an item whose name comes from the adjustment catalog.
    pub fn add_from_catalog(
        &mut self,
        code: &str,
        kind: AdjustmentKind,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Uuid, AdjustmentError> {
        let item = AdjustmentItem::from_catalog(code, kind, amount, description)?;
        Ok(self.push(item))
    }

    fn push(&mut self, item: AdjustmentItem) -> Uuid {
        let id = item.id;
        debug!(
            %id,
            code = %item.code,
            kind = %item.kind,
            amount = %item.amount,
            "adjustment added"
        );
        self.items.push(item);
        id
    }

    /// Removes the item with `id` and returns it.
    pub fn remove(&mut self, id: Uuid) -> Result<AdjustmentItem, AdjustmentError> {
        let index = self.position(id)?;
        Ok(self.items.remove(index))
    }

    /// Replaces the item with `id` by a newly created one.
    ///
    /// The set is left unchanged if `new` fails validation.
    pub fn replace(&mut self, id: Uuid, new: NewAdjustmentItem) -> Result<Uuid, AdjustmentError> {
        let index = self.position(id)?;
        let item = AdjustmentItem::create(new)?;
        self.items.remove(index);
        Ok(self.push(item))
    }

    pub fn get(&self, id: Uuid) -> Option<&AdjustmentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[AdjustmentItem] {
        &self.items
    }

    pub fn total(&self, kind: AdjustmentKind) -> Result<Decimal, CalculationError> {
        total_of_kind(&self.items, kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: Uuid) -> Result<usize, AdjustmentError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(AdjustmentError::NotFound(id))
    }
}
