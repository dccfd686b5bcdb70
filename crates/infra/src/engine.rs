//! Inventory synchronization engine.
//!
//! `InventorySync` is the single owner of stock, the service catalog and open
//! orders. Every order operation runs the same pipeline under one write lock:
//!
//! ```text
//! intent (create / change status / replace lines / delete)
//!   ↓
//! 1. Load the order (or an empty one for creation)
//!   ↓
//! 2. Plan the stock action from old/new status region
//!   ↓
//! 3. Compute fresh consumption if the action applies one
//!   ↓
//! 4. Handle the order command (pure, emits events)
//!   ↓
//! 5. Replay Released/Attached events into one stock transaction,
//!    checking availability before each apply
//!   ↓
//! 6. Commit stock, apply events to the order, store the order
//! ```
//!
//! Any failure before step 6 leaves stock and order untouched.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use stockflow_catalog::{MaterialRequirement, ServicePack, ServiceRequirement};
use stockflow_core::{Aggregate, DomainError, MaterialId, OrderId, PackId, Quantity, ServiceId};
use stockflow_events::Event;
use stockflow_inventory::{
    Availability, MaterialItem, ProjectedItem, RequirementVector, StockAlerts,
    check_availability, low_stock, out_of_stock, theoretical_inventory,
};
use stockflow_orders::{
    ChangeStatus, ClientOrder, CreateOrder, DeleteOrder, Order, OrderCommand, OrderEvent,
    OrderStatus, PackLine, ReplaceLines, ServiceLine, ServiceOrder, TransitionAction,
    compute_consumption, plan_transition,
};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult, SyncWarning};
use crate::snapshot::SnapshotStore;
use crate::state::{OrderBook, SyncState};

/// Result of an order operation that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<L> {
    /// The order after the operation (for deletions, its final state).
    pub order: Order<L>,
    /// Stock action that ran.
    pub action: TransitionAction,
    pub warnings: Vec<SyncWarning>,
}

enum Intent<L> {
    Create { lines: Vec<L>, status: OrderStatus },
    ChangeStatus(OrderStatus),
    ReplaceLines(Vec<L>),
    Delete,
}

impl<L: OrderBook> Intent<L> {
    fn name(&self) -> &'static str {
        match self {
            Intent::Create { .. } => "create",
            Intent::ChangeStatus(_) => "change_status",
            Intent::ReplaceLines(_) => "replace_lines",
            Intent::Delete => "delete",
        }
    }

    fn new_lines(&self) -> Option<&[L]> {
        match self {
            Intent::Create { lines, .. } | Intent::ReplaceLines(lines) => Some(lines.as_slice()),
            Intent::ChangeStatus(_) | Intent::Delete => None,
        }
    }

    fn into_command(
        self,
        order_id: OrderId,
        consumption: Option<RequirementVector>,
        occurred_at: DateTime<Utc>,
    ) -> OrderCommand<L> {
        match self {
            Intent::Create { lines, status } => OrderCommand::CreateOrder(CreateOrder {
                order_id,
                lines,
                status,
                consumption,
                occurred_at,
            }),
            Intent::ChangeStatus(status) => OrderCommand::ChangeStatus(ChangeStatus {
                order_id,
                status,
                consumption,
                occurred_at,
            }),
            Intent::ReplaceLines(lines) => OrderCommand::ReplaceLines(ReplaceLines {
                order_id,
                lines,
                occurred_at,
            }),
            Intent::Delete => OrderCommand::DeleteOrder(DeleteOrder {
                order_id,
                occurred_at,
            }),
        }
    }
}

/// Inventory consumption & synchronization engine.
///
/// Safe to share across threads (`Arc<InventorySync>`). Mutations serialize on
/// one write lock, so two status changes can never both pass an availability
/// check against the same stale stock.
#[derive(Debug, Default)]
pub struct InventorySync {
    state: RwLock<SyncState>,
    config: SyncConfig,
}

impl InventorySync {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            state: RwLock::new(SyncState::new()),
            config,
        }
    }

    /// Adopt an existing state; rejects one whose orders and consumption disagree.
    pub fn from_state(state: SyncState, config: SyncConfig) -> SyncResult<Self> {
        state.validate()?;
        Ok(Self {
            state: RwLock::new(state),
            config,
        })
    }

    /// Start from whatever `store` holds (empty state if nothing was saved).
    pub fn load_from(store: &impl SnapshotStore, config: SyncConfig) -> SyncResult<Self> {
        let state = store.load()?.unwrap_or_default();
        tracing::info!(
            materials = state.inventory.len(),
            orders = state.orders.len(),
            client_orders = state.client_orders.len(),
            "inventory sync state loaded"
        );
        Self::from_state(state, config)
    }

    pub fn save_to(&self, store: &impl SnapshotStore) -> SyncResult<()> {
        let state = self.snapshot()?;
        store.save(&state)?;
        Ok(())
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> SyncResult<SyncState> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> SyncResult<RwLockReadGuard<'_, SyncState>> {
        self.state.read().map_err(|_| SyncError::LockPoisoned)
    }

    fn write(&self) -> SyncResult<RwLockWriteGuard<'_, SyncState>> {
        self.state.write().map_err(|_| SyncError::LockPoisoned)
    }

    // ---------------------------------------------------------------------
    // Materials (administrative edits, not reconciled against orders)
    // ---------------------------------------------------------------------

    pub fn upsert_material(&self, item: MaterialItem) -> SyncResult<Option<MaterialItem>> {
        let mut state = self.write()?;
        tracing::info!(item_id = %item.id_typed(), quantity = %item.quantity(), "material upserted");
        Ok(state.inventory.upsert(item))
    }

    pub fn set_material_quantity(&self, item_id: &MaterialId, quantity: Quantity) -> SyncResult<MaterialItem> {
        let mut state = self.write()?;
        let item = state.inventory.set_quantity(item_id, quantity)?.clone();
        tracing::info!(item_id = %item_id, quantity = %quantity, "material quantity set");
        Ok(item)
    }

    pub fn remove_material(&self, item_id: &MaterialId) -> SyncResult<Option<MaterialItem>> {
        let mut state = self.write()?;
        let removed = state.inventory.remove(item_id);
        if removed.is_some() {
            tracing::info!(item_id = %item_id, "material removed");
        }
        Ok(removed)
    }

    pub fn material(&self, item_id: &MaterialId) -> SyncResult<Option<MaterialItem>> {
        Ok(self.read()?.inventory.get(item_id).cloned())
    }

    pub fn materials(&self) -> SyncResult<Vec<MaterialItem>> {
        Ok(self.read()?.inventory.items().cloned().collect())
    }

    // ---------------------------------------------------------------------
    // Service requirement registry
    // ---------------------------------------------------------------------

    pub fn get_mapping(&self, service_id: &ServiceId) -> SyncResult<Option<ServiceRequirement>> {
        Ok(self.read()?.registry.get(service_id).cloned())
    }

    /// Replace a service's requirements. Consumption already attached to
    /// orders is not recomputed.
    pub fn set_mapping(
        &self,
        service_id: ServiceId,
        requirements: Vec<MaterialRequirement>,
    ) -> SyncResult<ServiceRequirement> {
        let mut state = self.write()?;
        Ok(state.registry.set(service_id, requirements)?.clone())
    }

    pub fn remove_mapping(&self, service_id: &ServiceId) -> SyncResult<Option<ServiceRequirement>> {
        Ok(self.write()?.registry.remove(service_id))
    }

    pub fn mappings(&self) -> SyncResult<Vec<ServiceRequirement>> {
        Ok(self.read()?.registry.all().cloned().collect())
    }

    // ---------------------------------------------------------------------
    // Pack catalog
    // ---------------------------------------------------------------------

    pub fn set_pack(&self, pack: ServicePack) -> SyncResult<()> {
        let pack_id = pack.id.clone();
        self.write()?.packs.set(pack)?;
        tracing::info!(pack_id = %pack_id, "pack saved");
        Ok(())
    }

    pub fn get_pack(&self, pack_id: &PackId) -> SyncResult<Option<ServicePack>> {
        Ok(self.read()?.packs.get(pack_id).cloned())
    }

    pub fn remove_pack(&self, pack_id: &PackId) -> SyncResult<Option<ServicePack>> {
        Ok(self.write()?.packs.remove(pack_id))
    }

    pub fn packs(&self) -> SyncResult<Vec<ServicePack>> {
        Ok(self.read()?.packs.all().cloned().collect())
    }

    // ---------------------------------------------------------------------
    // Service orders
    // ---------------------------------------------------------------------

    /// Create an order. Created directly into a consuming status, it applies
    /// consumption or fails with `InsufficientStock` and is not created.
    pub fn create_order(&self, lines: Vec<ServiceLine>, status: OrderStatus) -> SyncResult<Transition<ServiceLine>> {
        self.transition(OrderId::new(), Intent::Create { lines, status })
    }

    pub fn set_order_status(&self, order_id: OrderId, status: OrderStatus) -> SyncResult<Transition<ServiceLine>> {
        self.transition(order_id, Intent::ChangeStatus(status))
    }

    /// Replace lines without moving stock. Attached consumption is kept until
    /// the next status change.
    pub fn update_order_lines(&self, order_id: OrderId, lines: Vec<ServiceLine>) -> SyncResult<Transition<ServiceLine>> {
        self.transition(order_id, Intent::ReplaceLines(lines))
    }

    /// Delete an order, restoring its consumption first if it is consuming.
    pub fn delete_order(&self, order_id: OrderId) -> SyncResult<Transition<ServiceLine>> {
        self.transition(order_id, Intent::Delete)
    }

    pub fn order(&self, order_id: OrderId) -> SyncResult<Option<ServiceOrder>> {
        Ok(self.read()?.orders.get(&order_id).cloned())
    }

    pub fn orders(&self) -> SyncResult<Vec<ServiceOrder>> {
        Ok(self.read()?.orders.values().cloned().collect())
    }

    // ---------------------------------------------------------------------
    // Client (pack) orders
    // ---------------------------------------------------------------------

    pub fn create_client_order(&self, lines: Vec<PackLine>, status: OrderStatus) -> SyncResult<Transition<PackLine>> {
        self.transition(OrderId::new(), Intent::Create { lines, status })
    }

    pub fn set_client_order_status(&self, order_id: OrderId, status: OrderStatus) -> SyncResult<Transition<PackLine>> {
        self.transition(order_id, Intent::ChangeStatus(status))
    }

    pub fn update_client_order_lines(&self, order_id: OrderId, lines: Vec<PackLine>) -> SyncResult<Transition<PackLine>> {
        self.transition(order_id, Intent::ReplaceLines(lines))
    }

    pub fn delete_client_order(&self, order_id: OrderId) -> SyncResult<Transition<PackLine>> {
        self.transition(order_id, Intent::Delete)
    }

    pub fn client_order(&self, order_id: OrderId) -> SyncResult<Option<ClientOrder>> {
        Ok(self.read()?.client_orders.get(&order_id).cloned())
    }

    pub fn client_orders(&self) -> SyncResult<Vec<ClientOrder>> {
        Ok(self.read()?.client_orders.values().cloned().collect())
    }

    // ---------------------------------------------------------------------
    // Advisory views
    // ---------------------------------------------------------------------

    /// Would `quantity` × `lines` fit in current stock? Used by the storefront
    /// before adding to cart and by order forms before submitting.
    pub fn check_availability<L: OrderBook>(&self, lines: &[L], quantity: Quantity) -> SyncResult<Availability> {
        let state = self.read()?;
        for line in lines {
            line.check_references(&state.packs)?;
        }
        let required = compute_consumption(lines, &state.registry, &state.packs)?
            .vector
            .scaled(quantity)?;
        Ok(check_availability(&required, &state.inventory))
    }

    pub fn low_stock_items(&self) -> SyncResult<Vec<MaterialItem>> {
        Ok(low_stock(self.read()?.inventory.items()))
    }

    pub fn out_of_stock_items(&self) -> SyncResult<Vec<MaterialItem>> {
        Ok(out_of_stock(self.read()?.inventory.items()))
    }

    pub fn stock_alerts(&self) -> SyncResult<StockAlerts> {
        Ok(StockAlerts::classify(self.read()?.inventory.items()))
    }

    /// Current stock minus the requirement of every consuming order.
    pub fn theoretical_inventory(&self) -> SyncResult<Vec<ProjectedItem>> {
        let state = self.read()?;
        let outstanding = state.outstanding_consumption()?;
        Ok(theoretical_inventory(&state.inventory, &outstanding)?)
    }

    // ---------------------------------------------------------------------
    // Transition primitive
    // ---------------------------------------------------------------------

    fn transition<L: OrderBook>(&self, order_id: OrderId, intent: Intent<L>) -> SyncResult<Transition<L>> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        let occurred_at = Utc::now();
        let intent_name = intent.name();

        let existing = L::book(state).get(&order_id).cloned();
        let order = match (&intent, existing) {
            (_, Some(order)) => order,
            (Intent::Create { .. }, None) => Order::empty(order_id),
            (_, None) => return Err(SyncError::OrderNotFound(order_id)),
        };

        if let Some(lines) = intent.new_lines() {
            for line in lines {
                line.check_references(&state.packs)?;
            }
        }

        let action = match &intent {
            Intent::Create { status, .. } => plan_transition(None, Some(*status)),
            Intent::ChangeStatus(status) => order.plan_status_change(*status),
            Intent::ReplaceLines(_) => TransitionAction::None,
            Intent::Delete => plan_transition(Some(order.status()), None),
        };

        let mut warnings = Vec::new();
        let consumption = if action.needs_fresh_consumption() {
            let lines = intent.new_lines().unwrap_or(order.lines());
            let computed = compute_consumption(lines, &state.registry, &state.packs)?;
            for pack_id in computed.unresolved_packs {
                tracing::warn!(order_id = %order_id, pack_id = %pack_id, "order references unknown pack");
                warnings.push(SyncWarning::UnknownPackReference { order_id, pack_id });
            }
            Some(computed.vector)
        } else {
            None
        };

        let command = intent.into_command(order_id, consumption, occurred_at);
        let events = order.handle(&command)?;

        let mut tx = state.inventory.begin();
        for event in &events {
            match event {
                OrderEvent::ConsumptionReleased(e) => tx.restore(&e.consumption)?,
                OrderEvent::ConsumptionAttached(e) => {
                    let availability = tx.check(&e.consumption);
                    if !availability.available {
                        tracing::warn!(
                            order_id = %order_id,
                            kind = L::KIND,
                            shortages = availability.shortages.len(),
                            "transition rejected: insufficient stock"
                        );
                        return Err(SyncError::InsufficientStock {
                            order_id,
                            shortages: availability.shortages,
                        });
                    }
                    if self.config.strict_references && !availability.unknown_items.is_empty() {
                        let names: Vec<_> = availability.unknown_items.iter().map(|i| i.to_string()).collect();
                        return Err(DomainError::validation(format!(
                            "consumption references unknown materials: {}",
                            names.join(", ")
                        ))
                        .into());
                    }
                    tx.consume(&e.consumption);
                }
                _ => {}
            }
        }
        warnings.extend(tx.commit().into_iter().map(SyncWarning::Stock));

        let mut order = order;
        for event in &events {
            tracing::debug!(
                order_id = %order_id,
                event_type = event.event_type(),
                moves_stock = event.moves_stock(),
                "applying order event"
            );
            order.apply(event);
        }

        let book = L::book_mut(state);
        if order.is_deleted() {
            book.remove(&order_id);
        } else {
            book.insert(order_id, order.clone());
        }

        tracing::info!(
            order_id = %order_id,
            kind = L::KIND,
            intent = intent_name,
            status = %order.status(),
            action = action.as_str(),
            warnings = warnings.len(),
            "order transition committed"
        );

        Ok(Transition {
            order,
            action,
            warnings,
        })
    }
}
