//! All-or-nothing stock movements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainResult, MaterialId, Quantity};

use crate::availability::{Availability, StockLevels, check_availability};
use crate::requirement::RequirementVector;
use crate::store::InventoryStore;

/// Non-fatal condition raised while moving stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockWarning {
    /// A vector entry refers to an item that no longer exists; the entry was skipped.
    UnknownItemReference { item_id: MaterialId, quantity: Quantity },
    /// A consumption exceeded what was on hand; the item was floored at zero.
    NegativeStockGuard {
        item_id: MaterialId,
        requested: Quantity,
        available: Quantity,
    },
}

impl core::fmt::Display for StockWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockWarning::UnknownItemReference { item_id, quantity } => {
                write!(f, "unknown material '{item_id}' (skipped {quantity})")
            }
            StockWarning::NegativeStockGuard {
                item_id,
                requested,
                available,
            } => write!(
                f,
                "stock of '{item_id}' floored at zero (requested {requested}, available {available})"
            ),
        }
    }
}

/// Staged stock movements over an [`InventoryStore`].
///
/// Reads see the staged quantities, so a restore followed by a check followed by
/// a consume behaves as one sequence. The store is untouched until `commit`.
#[derive(Debug)]
pub struct StockTransaction<'a> {
    store: &'a mut InventoryStore,
    staged: BTreeMap<MaterialId, Quantity>,
    warnings: Vec<StockWarning>,
}

impl<'a> StockTransaction<'a> {
    pub(crate) fn new(store: &'a mut InventoryStore) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Availability of `required` against the staged view.
    pub fn check(&self, required: &RequirementVector) -> Availability {
        check_availability(required, self)
    }

    /// Subtract `required` (apply consumption).
    ///
    /// Callers check availability first; the zero floor only engages when they
    /// did not, and it is reported as [`StockWarning::NegativeStockGuard`].
    pub fn consume(&mut self, required: &RequirementVector) {
        for (item_id, quantity) in required.iter() {
            let Some(on_hand) = self.quantity_of(item_id) else {
                self.warnings.push(StockWarning::UnknownItemReference {
                    item_id: item_id.clone(),
                    quantity,
                });
                continue;
            };

            let next = match on_hand.checked_sub(quantity) {
                Some(next) => next,
                None => {
                    self.warnings.push(StockWarning::NegativeStockGuard {
                        item_id: item_id.clone(),
                        requested: quantity,
                        available: on_hand,
                    });
                    Quantity::ZERO
                }
            };
            self.staged.insert(item_id.clone(), next);
        }
    }

    /// Add `consumed` back (restore consumption).
    ///
    /// Fails without staging anything if an item would overflow.
    pub fn restore(&mut self, consumed: &RequirementVector) -> DomainResult<()> {
        let mut restored = Vec::with_capacity(consumed.len());
        let mut unknown = Vec::new();
        for (item_id, quantity) in consumed.iter() {
            match self.quantity_of(item_id) {
                Some(on_hand) => restored.push((item_id.clone(), on_hand.checked_add(quantity)?)),
                None => unknown.push(StockWarning::UnknownItemReference {
                    item_id: item_id.clone(),
                    quantity,
                }),
            }
        }

        self.staged.extend(restored);
        self.warnings.extend(unknown);
        Ok(())
    }

    pub fn warnings(&self) -> &[StockWarning] {
        &self.warnings
    }

    /// Write every staged quantity to the store and return the warnings raised.
    pub fn commit(self) -> Vec<StockWarning> {
        let Self {
            store,
            staged,
            warnings,
        } = self;

        for (item_id, quantity) in &staged {
            store.write_quantity(item_id, *quantity);
        }
        for warning in &warnings {
            tracing::warn!(warning = %warning, "stock movement warning");
        }
        tracing::debug!(items = staged.len(), "stock transaction committed");
        warnings
    }
}

impl StockLevels for StockTransaction<'_> {
    fn quantity_of(&self, item_id: &MaterialId) -> Option<Quantity> {
        let on_hand = self.store.quantity_of(item_id)?;
        Some(self.staged.get(item_id).copied().unwrap_or(on_hand))
    }
}
