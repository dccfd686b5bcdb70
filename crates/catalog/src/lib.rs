//! Service catalog: what each service consumes, and how packs bundle services.
//!
//! Both structures are plain owned values. The synchronization engine keeps one
//! instance of each behind its lock; tests build fresh ones.

pub mod pack;
pub mod registry;

pub use pack::{PackCatalog, PackItem, ServicePack};
pub use registry::{MaterialRequirement, ServiceRequirement, ServiceRequirementRegistry};
