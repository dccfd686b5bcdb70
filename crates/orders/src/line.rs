//! Order line kinds: direct service lines and storefront pack lines.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use stockflow_catalog::PackCatalog;
use stockflow_core::{DomainError, DomainResult, PackId, Quantity, ServiceId};

use crate::consumption::ServiceUnits;

/// A line that can be expanded into units of services.
///
/// Implemented by [`ServiceLine`] (counter orders) and [`PackLine`] (client
/// storefront orders) so both order kinds share one aggregate and one
/// transition path.
pub trait ConsumingLine:
    Clone + core::fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Shape checks that need no catalog.
    fn validate(&self) -> DomainResult<()>;

    /// Reference checks against the pack catalog (only pack lines have any).
    fn check_references(&self, _packs: &PackCatalog) -> DomainResult<()> {
        Ok(())
    }

    /// The service units this line stands for. Fails only on quantity overflow.
    fn service_units(&self, packs: &PackCatalog) -> DomainResult<LineUnits>;
}

/// A line resolved against the pack catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineUnits {
    Services(Vec<ServiceUnits>),
    /// The line names a pack the catalog no longer has.
    UnknownPack(PackId),
}

/// Units of one service within an order (e.g. 20 kg of "wash").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub service_id: ServiceId,
    pub quantity: Quantity,
}

impl ConsumingLine for ServiceLine {
    fn validate(&self) -> DomainResult<()> {
        if self.quantity.is_zero() {
            return Err(DomainError::validation(format!(
                "quantity of service '{}' must be positive",
                self.service_id
            )));
        }
        Ok(())
    }

    fn service_units(&self, _packs: &PackCatalog) -> DomainResult<LineUnits> {
        Ok(LineUnits::Services(vec![ServiceUnits {
            service_id: self.service_id.clone(),
            quantity: self.quantity,
        }]))
    }
}

/// A number of packs in a client order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLine {
    pub pack_id: PackId,
    pub quantity: u32,
}

impl ConsumingLine for PackLine {
    fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation(format!(
                "quantity of pack '{}' must be positive",
                self.pack_id
            )));
        }
        Ok(())
    }

    fn check_references(&self, packs: &PackCatalog) -> DomainResult<()> {
        if !packs.contains(&self.pack_id) {
            return Err(DomainError::not_found(format!("pack '{}'", self.pack_id)));
        }
        Ok(())
    }

    fn service_units(&self, packs: &PackCatalog) -> DomainResult<LineUnits> {
        let Some(pack) = packs.get(&self.pack_id) else {
            return Ok(LineUnits::UnknownPack(self.pack_id.clone()));
        };
        let packs_ordered = Quantity::from_units(self.quantity);
        let units = pack
            .items
            .iter()
            .map(|item| {
                Ok(ServiceUnits {
                    service_id: item.service_id.clone(),
                    quantity: item.quantity_per_unit.checked_mul(packs_ordered)?,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(LineUnits::Services(units))
    }
}
