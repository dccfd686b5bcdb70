use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, Entity, MaterialId, Quantity, check_keys};

use crate::availability::StockLevels;
use crate::item::MaterialItem;
use crate::transaction::StockTransaction;

/// Current quantity per material item. The single source of truth for stock.
///
/// Consumption only moves stock through [`InventoryStore::begin`]; the other
/// mutators are direct administrative edits and are not reconciled against
/// orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryStore {
    items: BTreeMap<MaterialId, MaterialItem>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &MaterialId) -> Option<&MaterialItem> {
        self.items.get(item_id)
    }

    pub fn contains(&self, item_id: &MaterialId) -> bool {
        self.items.contains_key(item_id)
    }

    /// Insert or replace an item record. Returns the previous record, if any.
    pub fn upsert(&mut self, item: MaterialItem) -> Option<MaterialItem> {
        self.items.insert(item.key(), item)
    }

    pub fn remove(&mut self, item_id: &MaterialId) -> Option<MaterialItem> {
        self.items.remove(item_id)
    }

    /// Overwrite an item's quantity (stock count, delivery received, ...).
    pub fn set_quantity(&mut self, item_id: &MaterialId, quantity: Quantity) -> DomainResult<&MaterialItem> {
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| DomainError::not_found(format!("material '{item_id}'")))?;
        item.set_quantity(quantity);
        Ok(item)
    }

    /// Fails if an item is keyed under another item's id (hand-edited snapshots).
    pub fn check_keys(&self) -> DomainResult<()> {
        check_keys(&self.items)
    }

    /// All items, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &MaterialItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start an all-or-nothing batch of stock movements.
    ///
    /// Nothing reaches the store until [`StockTransaction::commit`]; dropping
    /// the transaction discards every staged movement.
    pub fn begin(&mut self) -> StockTransaction<'_> {
        StockTransaction::new(self)
    }

    pub(crate) fn write_quantity(&mut self, item_id: &MaterialId, quantity: Quantity) {
        if let Some(item) = self.items.get_mut(item_id) {
            item.set_quantity(quantity);
        }
    }
}

impl StockLevels for InventoryStore {
    fn quantity_of(&self, item_id: &MaterialId) -> Option<Quantity> {
        self.items.get(item_id).map(MaterialItem::quantity)
    }
}
