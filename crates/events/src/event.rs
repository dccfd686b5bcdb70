use chrono::{DateTime, Utc};

/// A fact decided by an aggregate.
///
/// Events here are not stored or replayed: the engine reads them once, right
/// after `handle`, to derive the stock movements a command implies, then
/// applies them to the aggregate. Persistence is a snapshot of current state.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, `<context>.<aggregate>.<fact>` (e.g. "orders.order.deleted").
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Whether committing this event moves stock.
    fn moves_stock(&self) -> bool {
        false
    }
}
