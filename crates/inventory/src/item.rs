use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, Entity, MaterialId, Quantity};

/// Where an item sits relative to its reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Healthy,
    Low,
    OutOfStock,
}

/// A raw material held in stock (detergent, softener, bags, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialItem {
    id: MaterialId,
    name: String,
    quantity: Quantity,
    unit: String,
    reorder_level: Quantity,
}

impl MaterialItem {
    pub fn new(
        id: MaterialId,
        name: impl Into<String>,
        quantity: Quantity,
        unit: impl Into<String>,
        reorder_level: Quantity,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("material name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            quantity,
            unit: unit.into(),
            reorder_level,
        })
    }

    pub fn id_typed(&self) -> &MaterialId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn reorder_level(&self) -> Quantity {
        self.reorder_level
    }

    pub fn level(&self) -> StockLevel {
        if self.quantity.is_zero() {
            StockLevel::OutOfStock
        } else if self.quantity <= self.reorder_level {
            StockLevel::Low
        } else {
            StockLevel::Healthy
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }
}

impl Entity for MaterialItem {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn soap(quantity: rust_decimal::Decimal) -> MaterialItem {
        MaterialItem::new(
            MaterialId::new("soap").unwrap(),
            "Soap",
            Quantity::new(quantity).unwrap(),
            "L",
            Quantity::new(dec!(5)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(soap(dec!(0)).level(), StockLevel::OutOfStock);
        assert_eq!(soap(dec!(0.001)).level(), StockLevel::Low);
        assert_eq!(soap(dec!(5)).level(), StockLevel::Low);
        assert_eq!(soap(dec!(5.01)).level(), StockLevel::Healthy);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = MaterialItem::new(
            MaterialId::new("soap").unwrap(),
            "  ",
            Quantity::ZERO,
            "L",
            Quantity::ZERO,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
