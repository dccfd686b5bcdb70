//! Value object trait: equality by value, not identity.
//!
//! Quantities and requirement vectors are value objects: two vectors holding the
//! same per-item amounts are interchangeable, wherever they were computed.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Dosage {
///     per_unit: Quantity,
///     unit: String,
/// }
///
/// impl ValueObject for Dosage {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
