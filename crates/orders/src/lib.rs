//! Orders domain module: order lifecycle and the consumption it implies.
//!
//! This crate contains business rules for service orders and client pack
//! orders, implemented purely as deterministic domain logic (no IO, no
//! locking, no storage). Stock is never touched here; the order aggregate
//! emits `ConsumptionAttached` / `ConsumptionReleased` events and the
//! synchronization engine turns those into stock movements.

pub mod consumption;
pub mod line;
pub mod order;
pub mod status;
pub mod transition;

pub use consumption::{Consumption, ServiceUnits, compute_consumption};
pub use line::{ConsumingLine, LineUnits, PackLine, ServiceLine};
pub use order::{
    ChangeStatus, ClientOrder, ConsumptionAttached, ConsumptionReleased, CreateOrder,
    DeleteOrder, Order, OrderCommand, OrderCreated, OrderDeleted, OrderEvent, OrderLinesReplaced,
    OrderStatusChanged, ReplaceLines, ServiceOrder,
};
pub use status::{OrderStatus, StockRegion};
pub use transition::{TransitionAction, plan_transition};
