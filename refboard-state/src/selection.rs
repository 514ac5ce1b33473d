//! Per-entity transient copies for detail, edit and delete dialogs.

use crate::observable::Observable;
use crate::store::EntityStore;
use refboard_core::{Entity, EntityId, StoreResult, ValidationError};
use serde_json::Value;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionSlot {
    Selected,
    Editing,
    PendingDelete,
}

impl SelectionSlot {
    pub const ALL: [SelectionSlot; 3] = [
        SelectionSlot::Selected,
        SelectionSlot::Editing,
        SelectionSlot::PendingDelete,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState<E> {
    pub selected: Option<E>,
    pub editing: Option<E>,
    pub pending_delete: Option<E>,
}

impl<E> Default for SelectionState<E> {
    fn default() -> Self {
        Self {
            selected: None,
            editing: None,
            pending_delete: None,
        }
    }
}

impl<E: Entity> SelectionState<E> {
    pub fn slot(&self, slot: SelectionSlot) -> Option<&E> {
        match slot {
            SelectionSlot::Selected => self.selected.as_ref(),
            SelectionSlot::Editing => self.editing.as_ref(),
            SelectionSlot::PendingDelete => self.pending_delete.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: SelectionSlot) -> &mut Option<E> {
        match slot {
            SelectionSlot::Selected => &mut self.selected,
            SelectionSlot::Editing => &mut self.editing,
            SelectionSlot::PendingDelete => &mut self.pending_delete,
        }
    }

    /// Slots currently holding a copy of `id`.
    pub fn slots_holding(&self, id: EntityId) -> Vec<SelectionSlot> {
        SelectionSlot::ALL
            .into_iter()
            .filter(|slot| self.slot(*slot).is_some_and(|entity| entity.id() == id))
            .collect()
    }
}

/// The three independent slots for one entity type.
///
/// Each slot holds a deep copy; edits to the `editing` copy never reach the
/// canonical collection until [`SelectionBuffer::commit_edit`].
#[derive(Debug)]
pub struct SelectionBuffer<E: Entity> {
    state: Observable<SelectionState<E>>,
}

impl<E: Entity> Default for SelectionBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> SelectionBuffer<E> {
    pub fn new() -> Self {
        Self {
            state: Observable::new(SelectionState::default()),
        }
    }

    pub fn select(&mut self, entity: &E) {
        self.fill(SelectionSlot::Selected, entity);
    }

    pub fn start_edit(&mut self, entity: &E) {
        self.fill(SelectionSlot::Editing, entity);
    }

    pub fn mark_for_delete(&mut self, entity: &E) {
        self.fill(SelectionSlot::PendingDelete, entity);
    }

    fn fill(&mut self, slot: SelectionSlot, entity: &E) {
        let copy = entity.clone();
        self.state.mutate(|state| *state.slot_mut(slot) = Some(copy));
        tracing::debug!(kind = %E::KIND, id = %entity.id(), ?slot, "selection filled");
    }

    pub fn get(&self, slot: SelectionSlot) -> Option<E> {
        self.state.read(|state| state.slot(slot).cloned())
    }

    pub fn selected(&self) -> Option<E> {
        self.get(SelectionSlot::Selected)
    }

    pub fn editing(&self) -> Option<E> {
        self.get(SelectionSlot::Editing)
    }

    pub fn pending_delete(&self) -> Option<E> {
        self.get(SelectionSlot::PendingDelete)
    }

    pub fn slots_holding(&self, id: EntityId) -> Vec<SelectionSlot> {
        self.state.read(|state| state.slots_holding(id))
    }

    pub fn snapshot(&self) -> SelectionState<E> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState<E>> {
        self.state.subscribe()
    }

    /// Set one field of the editing copy.
    ///
    /// `path` is a serialized field name, optionally followed by one nested
    /// field (`permissions.can_view_reports`). Returns `Ok(false)` when
    /// nothing is being edited.
    pub fn update_editing_field(&mut self, path: &str, value: Value) -> Result<bool, ValidationError> {
        let Some(current) = self.editing() else {
            tracing::debug!(kind = %E::KIND, path, "field update ignored: nothing being edited");
            return Ok(false);
        };
        let updated = with_field(&current, path, value)?;
        self.state.mutate(|state| state.editing = Some(updated));
        tracing::debug!(kind = %E::KIND, id = %current.id(), path, "editing field updated");
        Ok(true)
    }

    /// Hand the editing copy to the store as a full-record update.
    ///
    /// `Ok(None)` when nothing is being edited. On failure the editing copy
    /// stays in place so the dialog can be corrected and resubmitted.
    pub fn commit_edit(&mut self, store: &mut EntityStore<E>) -> StoreResult<Option<E>> {
        let Some(mut draft) = self.editing() else {
            tracing::debug!(kind = %E::KIND, "commit ignored: nothing being edited");
            return Ok(None);
        };
        draft.refresh_derived();
        let stored = store.update_record(draft)?;
        self.state.mutate(|state| {
            state.editing = None;
            // Other slots showing this record pick up the committed values.
            for slot in [SelectionSlot::Selected, SelectionSlot::PendingDelete] {
                let held = state.slot_mut(slot);
                if held.as_ref().is_some_and(|entity| entity.id() == stored.id()) {
                    *held = Some(stored.clone());
                }
            }
        });
        tracing::info!(kind = %E::KIND, id = %stored.id(), "edit committed");
        Ok(Some(stored))
    }

    pub fn clear(&mut self, slot: SelectionSlot) {
        self.state.mutate_if(|state| state.slot_mut(slot).take().is_some());
    }

    pub fn clear_all(&mut self) {
        self.state.mutate_if(|state| {
            let mut changed = false;
            for slot in SelectionSlot::ALL {
                changed |= state.slot_mut(slot).take().is_some();
            }
            changed
        });
    }

    /// Clear every slot holding `id`, returning the slots that were cleared.
    pub fn release(&mut self, id: EntityId) -> Vec<SelectionSlot> {
        let mut released = Vec::new();
        self.state.mutate_if(|state| {
            for slot in state.slots_holding(id) {
                *state.slot_mut(slot) = None;
                released.push(slot);
            }
            !released.is_empty()
        });
        released
    }

    /// Clear every slot whose record fails `keep`, returning the cleared slots.
    pub fn retain(&mut self, keep: impl Fn(EntityId) -> bool) -> Vec<SelectionSlot> {
        let mut released = Vec::new();
        self.state.mutate_if(|state| {
            for slot in SelectionSlot::ALL {
                let stale = state.slot(slot).is_some_and(|entity| !keep(entity.id()));
                if stale {
                    *state.slot_mut(slot) = None;
                    released.push(slot);
                }
            }
            !released.is_empty()
        });
        released
    }
}

/// Clone `entity` with the field at `path` replaced by `value`.
fn with_field<E: Entity>(entity: &E, path: &str, value: Value) -> Result<E, ValidationError> {
    let segments: Vec<&str> = path.split('.').collect();
    let (head, nested) = match segments.as_slice() {
        [head] => (*head, None),
        [head, field] => (*head, Some(*field)),
        _ => return Err(ValidationError::invalid(path, "at most one nested level is supported")),
    };
    if head == "id" {
        return Err(ValidationError::invalid(path, "is read-only"));
    }

    let mut document =
        serde_json::to_value(entity).map_err(|err| ValidationError::invalid(path, err.to_string()))?;
    let unknown = || ValidationError::invalid(path, "unknown field");
    let target = document
        .as_object_mut()
        .and_then(|fields| fields.get_mut(head))
        .ok_or_else(unknown)?;
    let target = match nested {
        None => target,
        Some(field) => target
            .as_object_mut()
            .ok_or_else(|| ValidationError::invalid(path, "not a nested record"))?
            .get_mut(field)
            .ok_or_else(unknown)?,
    };
    *target = value;

    serde_json::from_value(document).map_err(|err| ValidationError::invalid(path, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refboard_core::{StoreError, User, UserPatch, UserRole};
    use serde_json::json;

    fn store_with_ann() -> (EntityStore<User>, User) {
        let mut store = EntityStore::new();
        let ann = store.create(&UserPatch::named("Ann", "ann@refs.org")).unwrap();
        (store, ann)
    }

    #[test]
    fn test_slots_hold_independent_copies() {
        let (_, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.select(&ann);
        selection.start_edit(&ann);
        selection
            .update_editing_field("phone", json!("555-0100"))
            .unwrap();
        assert_eq!(selection.selected().unwrap().phone, "");
        assert_eq!(selection.editing().unwrap().phone, "555-0100");
    }

    #[test]
    fn test_update_field_without_editing_is_noop() {
        let mut selection = SelectionBuffer::<User>::new();
        let mut rx = selection.subscribe();
        assert_eq!(selection.update_editing_field("name", json!("X")), Ok(false));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_update_nested_field_preserves_siblings() {
        let (_, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.start_edit(&ann);
        selection
            .update_editing_field("permissions.can_view_reports", json!(true))
            .unwrap();
        let editing = selection.editing().unwrap();
        assert!(editing.permissions.can_view_reports);
        assert!(editing.permissions.account_is_active);
    }

    #[test]
    fn test_update_enum_field_by_serialized_name() {
        let (_, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.start_edit(&ann);
        selection
            .update_editing_field("role", json!("assessor"))
            .unwrap();
        assert_eq!(selection.editing().unwrap().role, UserRole::Assessor);
    }

    #[test]
    fn test_invalid_paths_leave_copy_unchanged() {
        let (_, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.start_edit(&ann);
        for (path, value) in [
            ("nickname", json!("x")),
            ("permissions.can_fly", json!(true)),
            ("email.domain", json!("x")),
            ("permissions.can_view_reports.deep", json!(true)),
            ("permissions.can_view_reports", json!("yes")),
            ("id", json!(9)),
        ] {
            let result = selection.update_editing_field(path, value);
            assert!(
                matches!(result, Err(ValidationError::InvalidValue { .. })),
                "{path} should be rejected"
            );
        }
        assert_eq!(selection.editing(), Some(ann));
    }

    #[test]
    fn test_commit_updates_store_and_clears_slot() {
        let (mut store, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.select(&ann);
        selection.start_edit(&ann);
        selection
            .update_editing_field("first_name", json!("Annie"))
            .unwrap();
        selection
            .update_editing_field("last_name", json!("Lee"))
            .unwrap();

        let stored = selection.commit_edit(&mut store).unwrap().unwrap();
        assert_eq!(stored.name, "Annie Lee");
        assert_eq!(store.get(ann.id), Some(stored.clone()));
        assert!(selection.editing().is_none());
        assert_eq!(selection.selected(), Some(stored));
    }

    #[test]
    fn test_commit_without_editing_is_noop() {
        let (mut store, _) = store_with_ann();
        let mut selection = SelectionBuffer::<User>::new();
        assert_eq!(selection.commit_edit(&mut store), Ok(None));
    }

    #[test]
    fn test_failed_commit_keeps_editing_copy() {
        let (mut store, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.start_edit(&ann);
        selection.update_editing_field("email", json!("")).unwrap();
        let err = selection.commit_edit(&mut store).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(selection.editing().unwrap().email, "");
        assert_eq!(store.get(ann.id).unwrap().email, "ann@refs.org");
    }

    #[test]
    fn test_release_clears_only_matching_slots() {
        let (mut store, ann) = store_with_ann();
        let bob = store.create(&UserPatch::named("Bob", "bob@refs.org")).unwrap();
        let mut selection = SelectionBuffer::new();
        selection.select(&ann);
        selection.start_edit(&bob);
        selection.mark_for_delete(&ann);

        let released = selection.release(ann.id);
        assert_eq!(
            released,
            vec![SelectionSlot::Selected, SelectionSlot::PendingDelete]
        );
        assert_eq!(selection.editing(), Some(bob));
        assert!(selection.release(ann.id).is_empty());
    }

    #[test]
    fn test_clear_all_empties_every_slot() {
        let (_, ann) = store_with_ann();
        let mut selection = SelectionBuffer::new();
        selection.select(&ann);
        selection.mark_for_delete(&ann);
        selection.clear_all();
        assert_eq!(selection.snapshot(), SelectionState::default());
    }
}
