//! Domain events.
//!
//! Aggregates in this workspace decide by returning events; the synchronization
//! engine reads those events to know which stock movements a command implies.

pub mod event;

pub use event::Event;
