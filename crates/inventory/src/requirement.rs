use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainResult, MaterialId, Quantity, ValueObject};

/// Aggregated material requirement: item → total quantity needed.
///
/// Items with a zero total are never stored, so an empty vector means
/// "consumes nothing". Iteration order is by item id, which keeps stock
/// movements and shortage reports deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementVector(BTreeMap<MaterialId, Quantity>);

impl ValueObject for RequirementVector {}

impl RequirementVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `quantity` of `item_id` into the vector.
    ///
    /// On overflow the vector is left as it was.
    pub fn add(&mut self, item_id: MaterialId, quantity: Quantity) -> DomainResult<()> {
        if quantity.is_zero() {
            return Ok(());
        }
        let total = self.get(&item_id).checked_add(quantity)?;
        self.0.insert(item_id, total);
        Ok(())
    }

    pub fn merge(&mut self, other: &RequirementVector) -> DomainResult<()> {
        for (item_id, quantity) in other.iter() {
            self.add(item_id.clone(), quantity)?;
        }
        Ok(())
    }

    /// Every entry multiplied by `factor` (cart quantity, pack count).
    pub fn scaled(&self, factor: Quantity) -> DomainResult<RequirementVector> {
        let mut out = RequirementVector::new();
        for (item_id, quantity) in self.iter() {
            out.add(item_id.clone(), quantity.checked_mul(factor)?)?;
        }
        Ok(out)
    }

    /// Required quantity of one item (zero when absent).
    pub fn get(&self, item_id: &MaterialId) -> Quantity {
        self.0.get(item_id).copied().unwrap_or(Quantity::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MaterialId, Quantity)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds from per-item totals. A repeated item keeps its last quantity; use
/// [`RequirementVector::add`] to accumulate.
impl FromIterator<(MaterialId, Quantity)> for RequirementVector {
    fn from_iter<I: IntoIterator<Item = (MaterialId, Quantity)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, quantity)| !quantity.is_zero()).collect())
    }
}
