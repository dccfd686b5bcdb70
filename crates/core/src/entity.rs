//! Records the stores index by a stable key (materials, packs).

use crate::error::{DomainError, DomainResult};

/// Something with an identity that survives edits to its other fields.
pub trait Entity {
    /// Stable key; stores keep entities in ordered maps.
    type Id: Clone + Ord + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Owned copy of the key, for map inserts.
    fn key(&self) -> Self::Id {
        self.id().clone()
    }
}

/// Fails if any entry is filed under a key other than its own id.
///
/// Maps deserialized from outside can disagree with the records they hold.
pub fn check_keys<'a, E>(entries: impl IntoIterator<Item = (&'a E::Id, &'a E)>) -> DomainResult<()>
where
    E: Entity + 'a,
{
    for (key, entity) in entries {
        if key != entity.id() {
            return Err(DomainError::invariant(format!(
                "record '{}' is filed under key '{key}'",
                entity.id()
            )));
        }
    }
    Ok(())
}
