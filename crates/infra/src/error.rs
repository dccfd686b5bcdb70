use thiserror::Error;

use stockflow_core::{DomainError, OrderId, PackId};
use stockflow_inventory::{Shortage, StockWarning};

use crate::snapshot::SnapshotError;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of an engine operation. When one is returned, neither stock nor the
/// order was changed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Stock cannot cover the consumption the transition would apply.
    #[error("insufficient stock for order {order_id} ({} item(s) short)", .shortages.len())]
    InsufficientStock {
        order_id: OrderId,
        shortages: Vec<Shortage>,
    },

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("engine state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl SyncError {
    /// Shortage list, if this is an insufficient-stock rejection.
    pub fn shortages(&self) -> Option<&[Shortage]> {
        match self {
            SyncError::InsufficientStock { shortages, .. } => Some(shortages.as_slice()),
            _ => None,
        }
    }
}

/// Non-fatal condition surfaced alongside a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// Raised by a stock movement (unknown item, zero floor engaged).
    Stock(StockWarning),
    /// A client order line refers to a pack the catalog no longer has; the
    /// line consumed nothing.
    UnknownPackReference { order_id: OrderId, pack_id: PackId },
}

impl core::fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SyncWarning::Stock(w) => core::fmt::Display::fmt(w, f),
            SyncWarning::UnknownPackReference { order_id, pack_id } => {
                write!(f, "order {order_id} references unknown pack '{pack_id}'")
            }
        }
    }
}
