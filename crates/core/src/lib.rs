//! `stockflow-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod quantity;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::{Entity, check_keys};
pub use error::{DomainError, DomainResult};
pub use id::{MaterialId, OrderId, PackId, ServiceId};
pub use quantity::Quantity;
pub use value_object::ValueObject;
