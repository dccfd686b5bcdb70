//! Process-wide logging setup shared by the stockflow binaries.

/// Tracing subscriber configuration (filters, JSON formatting).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init, init_with_default};
