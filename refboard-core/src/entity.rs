//! The contract every console-managed record implements.

use crate::{EntityId, EntityKind, ValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// A tab (category filter) shown above an entity table.
///
/// Every tab set has a catch-all tab, which is also its `Default`.
pub trait FilterTab: Copy + Eq + Hash + Debug + Default + Send + Sync + 'static {
    /// Every tab in display order, catch-all first.
    fn all() -> &'static [Self];

    fn label(&self) -> &'static str;

    fn is_catch_all(&self) -> bool {
        *self == Self::default()
    }
}

/// A domain record held in a canonical collection.
///
/// `Default` supplies the type defaults that `create` merges a patch over.
/// Serialization uses snake_case field names, which are also the paths
/// accepted by field-level editing.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Partial update: every field optional, unspecified fields preserved.
    type Patch: Clone + Debug + Default + Send + Sync;

    type Tab: FilterTab;

    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Recompute derived attributes from their sources.
    fn refresh_derived(&mut self) {}

    fn validate(&self) -> Result<(), ValidationError>;

    /// Text fields the console search box matches against. The stringified id
    /// is always searched in addition to these.
    fn search_fields(&self) -> Vec<&str>;

    fn matches_tab(&self, tab: Self::Tab) -> bool;

    /// Case-insensitive substring match of `term` against the search fields.
    /// A blank term matches every record.
    fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        if self.id().to_string().contains(&needle) {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Trim a string and reject it when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

/// Overwrite `target` with a clone of `value` when the patch carries one.
pub(crate) fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}
