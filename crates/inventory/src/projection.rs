//! Theoretical (projected) inventory for planning displays. Advisory only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockflow_core::{DomainResult, MaterialId, Quantity};

use crate::item::MaterialItem;
use crate::requirement::RequirementVector;
use crate::store::InventoryStore;

/// Projected level of one item. `projected` may be negative: that is the
/// shortfall the display is meant to flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedItem {
    pub item_id: MaterialId,
    pub name: String,
    pub unit: String,
    pub current: Quantity,
    pub projected: Decimal,
    pub reorder_level: Quantity,
}

impl ProjectedItem {
    fn from_item(item: &MaterialItem) -> Self {
        Self {
            item_id: item.id_typed().clone(),
            name: item.name().to_string(),
            unit: item.unit().to_string(),
            current: item.quantity(),
            projected: item.quantity().value(),
            reorder_level: item.reorder_level(),
        }
    }

    pub fn is_short(&self) -> bool {
        self.projected < Decimal::ZERO
    }

    pub fn needs_reorder(&self) -> bool {
        self.projected <= self.reorder_level.value()
    }
}

/// `projected(item) = current(item) - Σ required(item)` over `outstanding`.
///
/// Requirements on items that are not in the store are ignored. Fails only if
/// the outstanding total overflows.
pub fn theoretical_inventory<'a>(
    store: &InventoryStore,
    outstanding: impl IntoIterator<Item = &'a RequirementVector>,
) -> DomainResult<Vec<ProjectedItem>> {
    let mut total = RequirementVector::new();
    for vector in outstanding {
        total.merge(vector)?;
    }

    Ok(store
        .items()
        .map(|item| {
            let mut projected = ProjectedItem::from_item(item);
            projected.projected -= total.get(item.id_typed()).value();
            projected
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(code: &str) -> MaterialId {
        MaterialId::new(code).unwrap()
    }

    fn q(value: Decimal) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn store() -> InventoryStore {
        let mut store = InventoryStore::new();
        store.upsert(MaterialItem::new(id("soap"), "Soap", q(dec!(10)), "L", q(dec!(5))).unwrap());
        store.upsert(MaterialItem::new(id("bags"), "Bags", q(dec!(3)), "pcs", q(dec!(1))).unwrap());
        store
    }

    #[test]
    fn subtracts_all_outstanding_requirements() {
        let a: RequirementVector = [(id("soap"), q(dec!(4)))].into_iter().collect();
        let b: RequirementVector = [(id("soap"), q(dec!(7))), (id("bags"), q(dec!(1)))]
            .into_iter()
            .collect();

        let projected = theoretical_inventory(&store(), [&a, &b]).unwrap();
        let soap = projected.iter().find(|p| p.item_id == id("soap")).unwrap();
        let bags = projected.iter().find(|p| p.item_id == id("bags")).unwrap();

        assert_eq!(soap.projected, dec!(-1));
        assert!(soap.is_short());
        assert_eq!(soap.current, q(dec!(10)));
        assert_eq!(bags.projected, dec!(2));
        assert!(!bags.is_short());
        assert!(!bags.needs_reorder());
    }

    #[test]
    fn nothing_outstanding_projects_current_stock() {
        let projected = theoretical_inventory(&store(), std::iter::empty()).unwrap();
        assert!(projected.iter().all(|p| p.projected == p.current.value()));
    }

    #[test]
    fn unknown_items_are_ignored() {
        let ghost: RequirementVector = [(id("ghost"), q(dec!(4)))].into_iter().collect();
        let projected = theoretical_inventory(&store(), [&ghost]).unwrap();
        assert_eq!(projected.len(), 2);
    }
}
