use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, Entity, PackId, Quantity, ServiceId, check_keys};

/// One service bundled into a pack, with how many units of it a single pack holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackItem {
    pub service_id: ServiceId,
    pub service_name: String,
    pub quantity_per_unit: Quantity,
}

/// A pre-priced bundle of services sold as one storefront unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePack {
    pub id: PackId,
    pub name: String,
    pub items: Vec<PackItem>,
}

impl ServicePack {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("pack name cannot be empty"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(format!(
                "pack '{}' must contain at least one service",
                self.id
            )));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity_per_unit.is_zero()) {
            return Err(DomainError::validation(format!(
                "pack '{}' holds zero units of service '{}'",
                self.id, item.service_id
            )));
        }
        Ok(())
    }
}

/// Packs available in the storefront, keyed by pack id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackCatalog {
    packs: BTreeMap<PackId, ServicePack>,
}

impl PackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pack_id: &PackId) -> Option<&ServicePack> {
        self.packs.get(pack_id)
    }

    pub fn contains(&self, pack_id: &PackId) -> bool {
        self.packs.contains_key(pack_id)
    }

    /// Insert or replace a pack. Orders already consuming keep what they consumed.
    pub fn set(&mut self, pack: ServicePack) -> DomainResult<()> {
        pack.validate()?;
        self.packs.insert(pack.key(), pack);
        Ok(())
    }

    pub fn remove(&mut self, pack_id: &PackId) -> Option<ServicePack> {
        self.packs.remove(pack_id)
    }

    pub fn all(&self) -> impl Iterator<Item = &ServicePack> {
        self.packs.values()
    }

    pub fn check_keys(&self) -> DomainResult<()> {
        check_keys(&self.packs)
    }
}

impl Entity for ServicePack {
    type Id = PackId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
