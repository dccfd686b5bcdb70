//! Order status lifecycle and its stock-consuming region.

use serde::{Deserialize, Serialize};

/// Order status lifecycle.
///
/// ```text
/// pending ──► processing ──► washing ──► drying ──► folding ──► ready ──► delivered
///    │        └──────────── consuming region ────────────┘
///    └──────────────────────────► cancelled ◄──────────────── (from anywhere)
/// ```
///
/// Transitions are unrestricted between any two statuses; only the stock
/// effect depends on the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Washing,
    Drying,
    Folding,
    Ready,
    Delivered,
    Cancelled,
}

/// Whether an order in a given status is drawing down material stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockRegion {
    Consuming,
    NonConsuming,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Washing,
        OrderStatus::Drying,
        OrderStatus::Folding,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn region(self) -> StockRegion {
        match self {
            OrderStatus::Processing
            | OrderStatus::Washing
            | OrderStatus::Drying
            | OrderStatus::Folding => StockRegion::Consuming,
            OrderStatus::Pending
            | OrderStatus::Ready
            | OrderStatus::Delivered
            | OrderStatus::Cancelled => StockRegion::NonConsuming,
        }
    }

    pub fn is_consuming(self) -> bool {
        self.region() == StockRegion::Consuming
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Washing => "washing",
            OrderStatus::Drying => "drying",
            OrderStatus::Folding => "folding",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
