use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, MaterialId, Quantity, ServiceId};

/// One material consumed by a service, per unit of that service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub item_id: MaterialId,
    pub quantity_per_unit: Quantity,
}

/// The materials a service consumes per unit rendered (e.g. litres of soap per kg).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequirement {
    pub service_id: ServiceId,
    pub requirements: Vec<MaterialRequirement>,
}

/// Service → material requirement mapping.
///
/// A service without a mapping consumes nothing; that is valid (not every
/// service has a material cost). Edits never touch consumption already applied
/// to orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequirementRegistry {
    mappings: BTreeMap<ServiceId, ServiceRequirement>,
}

impl ServiceRequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, service_id: &ServiceId) -> Option<&ServiceRequirement> {
        self.mappings.get(service_id)
    }

    /// Replace the mapping of `service_id`.
    ///
    /// Requirement order is preserved. An item may appear at most once.
    pub fn set(
        &mut self,
        service_id: ServiceId,
        requirements: Vec<MaterialRequirement>,
    ) -> DomainResult<&ServiceRequirement> {
        let mut seen = BTreeSet::new();
        for req in &requirements {
            if !seen.insert(&req.item_id) {
                return Err(DomainError::validation(format!(
                    "service '{service_id}' lists material '{}' more than once",
                    req.item_id
                )));
            }
        }

        tracing::debug!(
            service_id = %service_id,
            requirement_count = requirements.len(),
            "service requirement mapping updated"
        );

        let mapping = ServiceRequirement {
            service_id: service_id.clone(),
            requirements,
        };
        self.mappings.insert(service_id.clone(), mapping);
        Ok(&self.mappings[&service_id])
    }

    pub fn remove(&mut self, service_id: &ServiceId) -> Option<ServiceRequirement> {
        self.mappings.remove(service_id)
    }

    /// All mappings, ordered by service id.
    pub fn all(&self) -> impl Iterator<Item = &ServiceRequirement> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
