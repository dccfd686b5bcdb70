//! Everything the engine guards behind its lock.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockflow_catalog::{PackCatalog, ServiceRequirementRegistry};
use stockflow_core::{DomainError, DomainResult, OrderId};
use stockflow_inventory::{InventoryStore, RequirementVector};
use stockflow_orders::{
    ClientOrder, ConsumingLine, Order, PackLine, ServiceLine, ServiceOrder, compute_consumption,
};

use crate::snapshot::SnapshotError;

/// Stock, catalog and open orders, as one unit of consistency.
///
/// This is also the snapshot format handed to a [`crate::SnapshotStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub inventory: InventoryStore,
    pub registry: ServiceRequirementRegistry,
    pub packs: PackCatalog,
    pub orders: BTreeMap<OrderId, ServiceOrder>,
    pub client_orders: BTreeMap<OrderId, ClientOrder>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirement of every order currently in the consuming region, computed
    /// from its current lines. Used by the theoretical projection.
    pub fn outstanding_consumption(&self) -> DomainResult<Vec<RequirementVector>> {
        fn consuming<L: ConsumingLine>(
            book: &BTreeMap<OrderId, Order<L>>,
            state: &SyncState,
        ) -> DomainResult<Vec<RequirementVector>> {
            book.values()
                .filter(|order| order.is_consuming())
                .map(|order| compute_consumption(order.lines(), &state.registry, &state.packs).map(|c| c.vector))
                .collect()
        }

        let mut out = consuming(&self.orders, self)?;
        out.extend(consuming(&self.client_orders, self)?);
        Ok(out)
    }

    /// Structural checks on a state that did not come from this engine
    /// (a loaded snapshot). The engine never produces a state that fails these.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let inconsistent = |e: DomainError| SnapshotError::Inconsistent(e.to_string());
        self.inventory.check_keys().map_err(inconsistent)?;
        self.packs.check_keys().map_err(inconsistent)?;
        check_book(&self.orders)?;
        check_book(&self.client_orders)
    }
}

fn check_book<L: OrderBook>(book: &BTreeMap<OrderId, Order<L>>) -> Result<(), SnapshotError> {
    for (key, order) in book {
        let id = order.id_typed();
        if *key != id {
            return Err(SnapshotError::Inconsistent(format!(
                "{} {id} is filed under key {key}",
                L::KIND
            )));
        }
        if order.is_deleted() {
            return Err(SnapshotError::Inconsistent(format!("{} {id} is deleted but still stored", L::KIND)));
        }
        if order.consumption().is_some() != order.is_consuming() {
            return Err(SnapshotError::Inconsistent(format!(
                "{} {id} in status {} {} attached consumption",
                L::KIND,
                order.status(),
                if order.is_consuming() { "lacks" } else { "carries" }
            )));
        }
    }
    Ok(())
}

/// Selects the order book holding orders with line kind `Self`.
pub trait OrderBook: ConsumingLine {
    /// Short label for logs ("order", "client_order").
    const KIND: &'static str;

    fn book(state: &SyncState) -> &BTreeMap<OrderId, Order<Self>>;

    fn book_mut(state: &mut SyncState) -> &mut BTreeMap<OrderId, Order<Self>>;
}

impl OrderBook for ServiceLine {
    const KIND: &'static str = "order";

    fn book(state: &SyncState) -> &BTreeMap<OrderId, Order<Self>> {
        &state.orders
    }

    fn book_mut(state: &mut SyncState) -> &mut BTreeMap<OrderId, Order<Self>> {
        &mut state.orders
    }
}

impl OrderBook for PackLine {
    const KIND: &'static str = "client_order";

    fn book(state: &SyncState) -> &BTreeMap<OrderId, Order<Self>> {
        &state.client_orders
    }

    fn book_mut(state: &mut SyncState) -> &mut BTreeMap<OrderId, Order<Self>> {
        &mut state.client_orders
    }
}
