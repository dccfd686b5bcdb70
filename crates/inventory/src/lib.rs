//! Inventory domain module: raw-material stock and the operations that move it.
//!
//! This crate contains business rules for stock levels, implemented purely as
//! deterministic domain logic (no IO, no locking, no storage). The
//! synchronization engine owns an [`InventoryStore`] and moves it through
//! [`StockTransaction`]s.

pub mod alerts;
pub mod availability;
pub mod item;
pub mod projection;
pub mod requirement;
pub mod store;
pub mod transaction;

pub use alerts::{StockAlerts, low_stock, out_of_stock};
pub use availability::{Availability, Shortage, StockLevels, check_availability};
pub use item::{MaterialItem, StockLevel};
pub use projection::{ProjectedItem, theoretical_inventory};
pub use requirement::RequirementVector;
pub use store::InventoryStore;
pub use transaction::{StockTransaction, StockWarning};
