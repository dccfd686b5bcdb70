//! Infrastructure layer: the inventory synchronization engine, its
//! configuration and the snapshot persistence seam.

pub mod config;
pub mod engine;
pub mod error;
pub mod snapshot;
pub mod state;


pub use config::SyncConfig;
pub use engine::{InventorySync, Transition};
pub use error::{SyncError, SyncResult, SyncWarning};
pub use snapshot::{InMemorySnapshotStore, JsonFileSnapshotStore, SnapshotError, SnapshotStore};
pub use state::{OrderBook, SyncState};
