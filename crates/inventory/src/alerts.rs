//! Low-stock / out-of-stock views, recomputed on demand.

use serde::{Deserialize, Serialize};

use crate::item::{MaterialItem, StockLevel};

/// Items with `0 < quantity <= reorder_level`.
pub fn low_stock<'a>(items: impl IntoIterator<Item = &'a MaterialItem>) -> Vec<MaterialItem> {
    items
        .into_iter()
        .filter(|i| i.level() == StockLevel::Low)
        .cloned()
        .collect()
}

/// Items with `quantity == 0`.
pub fn out_of_stock<'a>(items: impl IntoIterator<Item = &'a MaterialItem>) -> Vec<MaterialItem> {
    items
        .into_iter()
        .filter(|i| i.level() == StockLevel::OutOfStock)
        .cloned()
        .collect()
}

/// Both alert sets from one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlerts {
    pub low_stock: Vec<MaterialItem>,
    pub out_of_stock: Vec<MaterialItem>,
}

impl StockAlerts {
    pub fn classify<'a>(items: impl IntoIterator<Item = &'a MaterialItem>) -> Self {
        let mut alerts = StockAlerts::default();
        for item in items {
            match item.level() {
                StockLevel::Low => alerts.low_stock.push(item.clone()),
                StockLevel::OutOfStock => alerts.out_of_stock.push(item.clone()),
                StockLevel::Healthy => {}
            }
        }
        alerts
    }

    pub fn is_empty(&self) -> bool {
        self.low_stock.is_empty() && self.out_of_stock.is_empty()
    }
}
