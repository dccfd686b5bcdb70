//! Consumption calculator: order lines + registry → requirement vector.

use serde::{Deserialize, Serialize};

use stockflow_catalog::{PackCatalog, ServiceRequirementRegistry};
use stockflow_core::{DomainResult, PackId, Quantity, ServiceId};
use stockflow_inventory::RequirementVector;

use crate::line::{ConsumingLine, LineUnits};

/// Units of a single service, after pack expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUnits {
    pub service_id: ServiceId,
    pub quantity: Quantity,
}

/// Calculator output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumption {
    pub vector: RequirementVector,
    /// Pack ids referenced by lines but missing from the catalog. Those lines
    /// contribute nothing.
    pub unresolved_packs: Vec<PackId>,
}

/// Aggregate the material requirement of `lines`.
///
/// Pure and deterministic. A service without a registry mapping consumes
/// nothing. Fails only if a total overflows.
pub fn compute_consumption<L: ConsumingLine>(
    lines: &[L],
    registry: &ServiceRequirementRegistry,
    packs: &PackCatalog,
) -> DomainResult<Consumption> {
    let mut out = Consumption::default();

    for line in lines {
        let units = match line.service_units(packs)? {
            LineUnits::Services(units) => units,
            LineUnits::UnknownPack(pack_id) => {
                if !out.unresolved_packs.contains(&pack_id) {
                    out.unresolved_packs.push(pack_id);
                }
                continue;
            }
        };

        for unit in units {
            let Some(mapping) = registry.get(&unit.service_id) else {
                continue;
            };
            for req in &mapping.requirements {
                let required = req.quantity_per_unit.checked_mul(unit.quantity)?;
                out.vector.add(req.item_id.clone(), required)?;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use stockflow_catalog::{MaterialRequirement, PackItem, ServicePack};
    use stockflow_core::MaterialId;

    use crate::line::{PackLine, ServiceLine};

    fn q(value: Decimal) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn material(code: &str) -> MaterialId {
        MaterialId::new(code).unwrap()
    }

    fn service(code: &str) -> ServiceId {
        ServiceId::new(code).unwrap()
    }

    fn registry() -> ServiceRequirementRegistry {
        let mut registry = ServiceRequirementRegistry::new();
        registry
            .set(
                service("wash"),
                vec![MaterialRequirement {
                    item_id: material("soap"),
                    quantity_per_unit: q(dec!(0.2)),
                }],
            )
            .unwrap();
        registry
            .set(
                service("a"),
                vec![MaterialRequirement {
                    item_id: material("z"),
                    quantity_per_unit: q(dec!(0.5)),
                }],
            )
            .unwrap();
        registry
            .set(
                service("dry"),
                vec![
                    MaterialRequirement {
                        item_id: material("soap"),
                        quantity_per_unit: q(dec!(0.05)),
                    },
                    MaterialRequirement {
                        item_id: material("sheets"),
                        quantity_per_unit: q(dec!(1)),
                    },
                ],
            )
            .unwrap();
        registry
    }

    fn packs() -> PackCatalog {
        let mut packs = PackCatalog::new();
        packs
            .set(ServicePack {
                id: PackId::new("bundle").unwrap(),
                name: "Bundle".to_string(),
                items: vec![PackItem {
                    service_id: service("a"),
                    service_name: "A".to_string(),
                    quantity_per_unit: Quantity::from_units(2),
                }],
            })
            .unwrap();
        packs
    }

    #[test]
    fn service_lines_multiply_per_unit_requirement() {
        let lines = vec![ServiceLine {
            service_id: service("wash"),
            quantity: Quantity::from_units(20),
        }];
        let result = compute_consumption(&lines, &registry(), &packs()).unwrap();
        assert_eq!(result.vector.get(&material("soap")), q(dec!(4)));
        assert!(result.unresolved_packs.is_empty());
    }

    #[test]
    fn totals_accumulate_across_lines() {
        let lines = vec![
            ServiceLine {
                service_id: service("wash"),
                quantity: Quantity::from_units(10),
            },
            ServiceLine {
                service_id: service("dry"),
                quantity: Quantity::from_units(10),
            },
        ];
        let result = compute_consumption(&lines, &registry(), &packs()).unwrap();
        assert_eq!(result.vector.get(&material("soap")), q(dec!(2.5)));
        assert_eq!(result.vector.get(&material("sheets")), q(dec!(10)));
        assert_eq!(result.vector.len(), 2);
    }

    #[test]
    fn pack_expansion_multiplies_nested_and_outer_quantities() {
        // 2 units of A per pack × 3 packs × 0.5 of Z per unit of A.
        let lines = vec![PackLine {
            pack_id: PackId::new("bundle").unwrap(),
            quantity: 3,
        }];
        let result = compute_consumption(&lines, &registry(), &packs()).unwrap();
        assert_eq!(result.vector.get(&material("z")), q(dec!(3.0)));
    }

    #[test]
    fn unmapped_service_consumes_nothing() {
        let lines = vec![ServiceLine {
            service_id: service("ironing"),
            quantity: Quantity::from_units(5),
        }];
        let result = compute_consumption(&lines, &registry(), &packs()).unwrap();
        assert!(result.vector.is_empty());
    }

    #[test]
    fn overflowing_line_is_an_error() {
        // One sheet per unit: each line alone fits, the total does not.
        let line = ServiceLine {
            service_id: service("dry"),
            quantity: q(Decimal::MAX),
        };
        let lines = vec![line.clone(), line];
        let err = compute_consumption(&lines, &registry(), &packs()).unwrap_err();
        assert!(matches!(err, stockflow_core::DomainError::Validation(_)));
    }

    #[test]
    fn missing_pack_is_reported_once_and_skipped() {
        let lines = vec![
            PackLine {
                pack_id: PackId::new("gone").unwrap(),
                quantity: 1,
            },
            PackLine {
                pack_id: PackId::new("gone").unwrap(),
                quantity: 2,
            },
            PackLine {
                pack_id: PackId::new("bundle").unwrap(),
                quantity: 1,
            },
        ];
        let result = compute_consumption(&lines, &registry(), &packs()).unwrap();
        assert_eq!(result.unresolved_packs, vec![PackId::new("gone").unwrap()]);
        assert_eq!(result.vector.get(&material("z")), q(dec!(1)));
    }
}
