//! Availability checking: can the current stock cover a requirement vector?

use serde::{Deserialize, Serialize};

use stockflow_core::{MaterialId, Quantity};

use crate::requirement::RequirementVector;

/// Read access to current stock levels.
///
/// Implemented by the committed store and by an in-flight transaction, so the
/// same check runs against either.
pub trait StockLevels {
    /// Current quantity of an item, or `None` if the item does not exist.
    fn quantity_of(&self, item_id: &MaterialId) -> Option<Quantity>;
}

/// One item whose requirement exceeds what is on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortage {
    pub item_id: MaterialId,
    pub required: Quantity,
    pub available: Quantity,
}

impl core::fmt::Display for Shortage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} (required {}, available {})",
            self.item_id, self.required, self.available
        )
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// `true` iff `shortages` is empty.
    pub available: bool,
    pub shortages: Vec<Shortage>,
    /// Items referenced by the vector that are not in stock records at all.
    /// They are skipped, not reported as shortages.
    pub unknown_items: Vec<MaterialId>,
}

/// Compare `required` against `stock`.
///
/// An item is short iff `required > current`. Items unknown to the stock are
/// listed separately and do not block availability.
pub fn check_availability(required: &RequirementVector, stock: &impl StockLevels) -> Availability {
    let mut shortages = Vec::new();
    let mut unknown_items = Vec::new();

    for (item_id, needed) in required.iter() {
        match stock.quantity_of(item_id) {
            None => unknown_items.push(item_id.clone()),
            Some(on_hand) if needed > on_hand => shortages.push(Shortage {
                item_id: item_id.clone(),
                required: needed,
                available: on_hand,
            }),
            Some(_) => {}
        }
    }

    Availability {
        available: shortages.is_empty(),
        shortages,
        unknown_items,
    }
}
