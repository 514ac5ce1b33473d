//! Canonical entity collections with search, tab filter and stats.

use crate::error::ConsoleResult;
use crate::observable::Observable;
use crate::selection::{SelectionBuffer, SelectionSlot};
use crate::source::EntitySource;
use refboard_core::{Entity, EntityId, FilterTab, StoreError, StoreResult, ValidationError};
use std::collections::HashSet;
use tokio::sync::watch;

/// Everything a collection view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<E: Entity> {
    /// Canonical records in insertion order.
    pub items: Vec<E>,
    pub search_term: String,
    pub active_tab: E::Tab,
    pub loading: bool,
    high_water: EntityId,
}

impl<E: Entity> Default for CollectionState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_term: String::new(),
            active_tab: E::Tab::default(),
            loading: false,
            high_water: EntityId::UNASSIGNED,
        }
    }
}

impl<E: Entity> CollectionState<E> {
    /// Records matching both the search term and the active tab, in
    /// canonical order. Recomputed on every call.
    pub fn filtered(&self) -> Vec<E> {
        self.items
            .iter()
            .filter(|item| item.matches_tab(self.active_tab) && item.matches_search(&self.search_term))
            .cloned()
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.matches_tab(self.active_tab) && item.matches_search(&self.search_term))
            .count()
    }

    /// Counts over the whole collection, ignoring search and tab.
    pub fn stats(&self) -> CollectionStats<E::Tab> {
        let per_tab = E::Tab::all()
            .iter()
            .filter(|tab| !tab.is_catch_all())
            .map(|tab| TabCount {
                tab: *tab,
                count: self.items.iter().filter(|item| item.matches_tab(*tab)).count(),
            })
            .collect();
        CollectionStats {
            total: self.items.len(),
            per_tab,
        }
    }

    /// Highest id this collection has ever held.
    pub fn high_water(&self) -> EntityId {
        self.high_water
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabCount<T> {
    pub tab: T,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats<T> {
    pub total: usize,
    pub per_tab: Vec<TabCount<T>>,
}

impl<T: FilterTab> CollectionStats<T> {
    pub fn count(&self, tab: T) -> usize {
        if tab.is_catch_all() {
            return self.total;
        }
        self.per_tab
            .iter()
            .find(|entry| entry.tab == tab)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Owner of one canonical collection.
///
/// Ids are assigned as one past the highest id the store has ever seen, so
/// an id is never handed out twice, even after deletes.
#[derive(Debug)]
pub struct EntityStore<E: Entity> {
    state: Observable<CollectionState<E>>,
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    pub fn new() -> Self {
        Self {
            state: Observable::new(CollectionState::default()),
        }
    }

    pub fn with_items(items: Vec<E>) -> StoreResult<Self> {
        let mut store = Self::new();
        store.replace_all(items)?;
        Ok(store)
    }

    pub fn list(&self) -> Vec<E> {
        self.state.read(|state| state.items.clone())
    }

    pub fn len(&self) -> usize {
        self.state.read(|state| state.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: EntityId) -> Option<E> {
        self.state
            .read(|state| state.items.iter().find(|item| item.id() == id).cloned())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.state.read(|state| state.position(id).is_some())
    }

    pub fn snapshot(&self) -> CollectionState<E> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<E>> {
        self.state.subscribe()
    }

    pub fn search_term(&self) -> String {
        self.state.read(|state| state.search_term.clone())
    }

    pub fn active_tab(&self) -> E::Tab {
        self.state.read(|state| state.active_tab)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.loading)
    }

    pub fn filtered_view(&self) -> Vec<E> {
        self.state.read(CollectionState::filtered)
    }

    pub fn filtered_len(&self) -> usize {
        self.state.read(CollectionState::filtered_len)
    }

    pub fn stats(&self) -> CollectionStats<E::Tab> {
        self.state.read(CollectionState::stats)
    }

    /// Merge `patch` over the type defaults and append the result.
    pub fn create(&mut self, patch: &E::Patch) -> StoreResult<E> {
        let created = self.state.try_mutate(|state| {
            let mut entity = E::default();
            entity.apply_patch(patch);
            entity.refresh_derived();
            entity.validate()?;
            let id = next_id(state.high_water)?;
            entity.set_id(id);
            state.high_water = id;
            state.items.push(entity.clone());
            Ok::<_, StoreError>(entity)
        });
        match &created {
            Ok(entity) => tracing::debug!(kind = %E::KIND, id = %entity.id(), "entity created"),
            Err(err) => tracing::warn!(kind = %E::KIND, error = %err, "create rejected"),
        }
        created
    }

    /// Merge `patch` into the stored record, preserving unspecified fields.
    pub fn update(&mut self, id: EntityId, patch: &E::Patch) -> StoreResult<E> {
        self.modify(id, |entity| entity.apply_patch(patch))
    }

    /// Replace the stored record carrying `entity.id()` with `entity`.
    pub fn update_record(&mut self, entity: E) -> StoreResult<E> {
        let id = entity.id();
        self.modify(id, move |stored| *stored = entity)
    }

    fn modify(&mut self, id: EntityId, apply: impl FnOnce(&mut E)) -> StoreResult<E> {
        let updated = self.state.try_mutate(|state| {
            let index = state
                .position(id)
                .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
            let mut entity = state.items[index].clone();
            apply(&mut entity);
            entity.set_id(id);
            entity.refresh_derived();
            entity.validate()?;
            state.items[index] = entity.clone();
            Ok::<_, StoreError>(entity)
        });
        match &updated {
            Ok(_) => tracing::debug!(kind = %E::KIND, %id, "entity updated"),
            Err(err) => tracing::warn!(kind = %E::KIND, %id, error = %err, "update rejected"),
        }
        updated
    }

    /// Remove a record and release every selection slot that points at it.
    pub fn delete(&mut self, id: EntityId, selection: &mut SelectionBuffer<E>) -> StoreResult<E> {
        let removed = self.state.try_mutate(|state| {
            let index = state
                .position(id)
                .ok_or_else(|| StoreError::not_found(E::KIND, id))?;
            Ok::<_, StoreError>(state.items.remove(index))
        });
        match &removed {
            Ok(_) => {
                let released = selection.release(id);
                tracing::debug!(kind = %E::KIND, %id, released = released.len(), "entity deleted");
            }
            Err(err) => tracing::warn!(kind = %E::KIND, %id, error = %err, "delete rejected"),
        }
        removed
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.state.mutate_if(|state| {
            if state.search_term == term {
                return false;
            }
            state.search_term = term;
            true
        });
    }

    pub fn set_tab(&mut self, tab: E::Tab) {
        self.state.mutate_if(|state| {
            if state.active_tab == tab {
                return false;
            }
            state.active_tab = tab;
            true
        });
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.mutate_if(|state| {
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        });
    }

    /// Replace the collection with records from the persistence collaborator.
    ///
    /// Records without an id get fresh ones; duplicate ids and an exhausted
    /// id space are rejected and leave the current collection in place. The
    /// id high-water mark never moves backwards.
    pub fn replace_all(&mut self, items: Vec<E>) -> StoreResult<()> {
        let count = items.len();
        self.state.try_mutate(|state| {
            let mut seen = HashSet::with_capacity(items.len());
            for item in items.iter().filter(|item| item.id().is_assigned()) {
                if !seen.insert(item.id()) {
                    return Err(ValidationError::DuplicateId {
                        kind: E::KIND,
                        id: item.id(),
                    }
                    .into());
                }
            }
            let mut high_water = items
                .iter()
                .map(Entity::id)
                .max()
                .unwrap_or(EntityId::UNASSIGNED)
                .max(state.high_water);
            let mut replaced = Vec::with_capacity(items.len());
            for mut item in items {
                if !item.id().is_assigned() {
                    high_water = next_id(high_water)?;
                    item.set_id(high_water);
                }
                item.refresh_derived();
                replaced.push(item);
            }
            state.items = replaced;
            state.high_water = high_water;
            Ok::<_, StoreError>(())
        })?;
        tracing::debug!(kind = %E::KIND, count, "collection replaced");
        Ok(())
    }

    /// Replace the collection and release every selection slot whose record
    /// did not survive the replacement.
    pub fn replace_all_releasing(
        &mut self,
        items: Vec<E>,
        selection: &mut SelectionBuffer<E>,
    ) -> StoreResult<Vec<SelectionSlot>> {
        self.replace_all(items)?;
        let released = selection.retain(|id| self.contains(id));
        if !released.is_empty() {
            tracing::debug!(kind = %E::KIND, released = released.len(), "stale selections released");
        }
        Ok(released)
    }

    /// Fetch the collection from `source`, flagging the store as loading
    /// while the fetch is in flight. Returns the selection slots released
    /// because their record is gone from the fetched set.
    pub async fn load_from<S>(
        &mut self,
        source: &S,
        selection: &mut SelectionBuffer<E>,
    ) -> ConsoleResult<Vec<SelectionSlot>>
    where
        S: EntitySource<E> + ?Sized,
    {
        self.set_loading(true);
        let fetched = source.fetch_all().await;
        self.set_loading(false);
        let items = fetched?;
        let count = items.len();
        let released = self.replace_all_releasing(items, selection)?;
        tracing::info!(kind = %E::KIND, count, "collection loaded");
        Ok(released)
    }
}

fn next_id(current: EntityId) -> Result<EntityId, ValidationError> {
    current
        .next()
        .ok_or_else(|| ValidationError::invalid("id", "id space exhausted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use refboard_core::{User, UserPatch, UserStatus, UserTab};

    fn user(id: u64, name: &str, email: &str, status: UserStatus) -> User {
        User {
            id: EntityId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            status,
            ..User::default()
        }
    }

    fn seeded() -> EntityStore<User> {
        EntityStore::with_items(vec![
            user(1, "Ann Lee", "ann@refs.org", UserStatus::Active),
            user(2, "Bob Stone", "bob@refs.org", UserStatus::Inactive),
            user(5, "Cara Diaz", "cara@league.org", UserStatus::Deleted),
        ])
        .unwrap()
    }

    #[test]
    fn test_create_assigns_id_past_high_water() {
        let mut store = seeded();
        let created = store.create(&UserPatch::named("Dan", "dan@refs.org")).unwrap();
        assert_eq!(created.id, EntityId::new(6));
        assert_eq!(store.len(), 4);
        assert_eq!(store.list().last(), Some(&created));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = seeded();
        let mut selection = SelectionBuffer::new();
        store.delete(EntityId::new(5), &mut selection).unwrap();
        let created = store.create(&UserPatch::named("Dan", "dan@refs.org")).unwrap();
        assert_eq!(created.id, EntityId::new(6));
    }

    #[test]
    fn test_create_rejects_invalid_without_mutation() {
        let mut store = seeded();
        let mut rx = store.subscribe();
        let err = store.create(&UserPatch::named("", "x@y.z")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.len(), 3);
        assert!(!rx.has_changed().unwrap());
        // A rejected create does not burn an id.
        let created = store.create(&UserPatch::named("Eve", "eve@refs.org")).unwrap();
        assert_eq!(created.id, EntityId::new(6));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_update_preserves_unspecified_fields() {
        let mut store = seeded();
        let updated = store
            .update(
                EntityId::new(2),
                &UserPatch {
                    phone: Some("555-0102".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone, "555-0102");
        assert_eq!(updated.email, "bob@refs.org");
        assert_eq!(store.get(EntityId::new(2)), Some(updated));
    }

    #[test]
    fn test_update_rederives_display_name() {
        let mut store = seeded();
        let updated = store
            .update(
                EntityId::new(1),
                &UserPatch {
                    first_name: Some("Anna".to_string()),
                    last_name: Some("Lee".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Anna Lee");
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let mut store = seeded();
        let before = store.list();
        let err = store
            .update(EntityId::new(99), &UserPatch::default())
            .unwrap_err();
        assert_eq!(err, StoreError::not_found(User::KIND, EntityId::new(99)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_update_rejects_invalid_email() {
        let mut store = seeded();
        let err = store
            .update(
                EntityId::new(1),
                &UserPatch {
                    email: Some("nope".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get(EntityId::new(1)).unwrap().email, "ann@refs.org");
    }

    #[test]
    fn test_delete_releases_selection_slots() {
        let mut store = seeded();
        let mut selection = SelectionBuffer::new();
        let bob = store.get(EntityId::new(2)).unwrap();
        let ann = store.get(EntityId::new(1)).unwrap();
        selection.select(&bob);
        selection.start_edit(&bob);
        selection.mark_for_delete(&ann);

        store.delete(EntityId::new(2), &mut selection).unwrap();
        assert!(selection.get(SelectionSlot::Selected).is_none());
        assert!(selection.get(SelectionSlot::Editing).is_none());
        assert_eq!(selection.pending_delete(), Some(ann));
    }

    #[test]
    fn test_delete_missing_id_is_not_found() {
        let mut store = seeded();
        let mut selection = SelectionBuffer::new();
        let err = store.delete(EntityId::new(42), &mut selection).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_filtered_view_combines_search_and_tab() {
        let mut store = seeded();
        store.set_search_term("REFS");
        assert_eq!(store.filtered_len(), 2);
        store.set_tab(UserTab::Inactive);
        let view = store.filtered_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Bob Stone");
        store.set_search_term("cara");
        assert!(store.filtered_view().is_empty());
    }

    #[test]
    fn test_filtered_view_matches_stringified_id() {
        let mut store = seeded();
        store.set_search_term("5");
        let view = store.filtered_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, EntityId::new(5));
    }

    #[test]
    fn test_stats_ignore_search_and_tab() {
        let mut store = seeded();
        store.set_search_term("ann");
        store.set_tab(UserTab::Active);
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(UserTab::All), 3);
        assert_eq!(stats.count(UserTab::Active), 1);
        assert_eq!(stats.count(UserTab::Inactive), 1);
        assert_eq!(stats.count(UserTab::Deleted), 1);
    }

    #[test]
    fn test_replace_all_rejects_duplicate_ids() {
        let mut store = seeded();
        let err = store
            .replace_all(vec![
                user(7, "A", "a@x.com", UserStatus::Active),
                user(7, "B", "b@x.com", UserStatus::Active),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::DuplicateId { .. })
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_all_assigns_missing_ids() {
        let mut store = EntityStore::<User>::new();
        store
            .replace_all(vec![
                user(3, "A", "a@x.com", UserStatus::Active),
                user(0, "B", "b@x.com", UserStatus::Active),
            ])
            .unwrap();
        let ids: Vec<u64> = store.list().iter().map(|u| u.id.get()).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(store.snapshot().high_water(), EntityId::new(4));
    }

    #[test]
    fn test_create_rejects_exhausted_id_space() {
        let mut store =
            EntityStore::with_items(vec![user(u64::MAX, "Max", "max@refs.org", UserStatus::Active)])
                .unwrap();
        let mut rx = store.subscribe();
        let before = store.list();
        let err = store.create(&UserPatch::named("Dan", "dan@refs.org")).unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::invalid("id", "id space exhausted"))
        );
        assert_eq!(store.list(), before);
        assert_eq!(store.snapshot().high_water(), EntityId::new(u64::MAX));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_replace_all_rejects_exhausted_id_space() {
        let mut store = seeded();
        let before = store.list();
        let err = store
            .replace_all(vec![
                user(u64::MAX, "Max", "max@refs.org", UserStatus::Active),
                user(0, "New", "new@refs.org", UserStatus::Active),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Validation(ValidationError::invalid("id", "id space exhausted"))
        );
        assert_eq!(store.list(), before);
        assert_eq!(store.snapshot().high_water(), EntityId::new(5));
    }

    #[test]
    fn test_replace_all_releasing_clears_missing_records() {
        let mut store = seeded();
        let mut selection = SelectionBuffer::new();
        let ann = store.get(EntityId::new(1)).unwrap();
        let bob = store.get(EntityId::new(2)).unwrap();
        selection.select(&bob);
        selection.start_edit(&ann);
        selection.mark_for_delete(&bob);

        let released = store
            .replace_all_releasing(
                vec![user(1, "Ann Lee", "ann@refs.org", UserStatus::Active)],
                &mut selection,
            )
            .unwrap();
        assert_eq!(
            released,
            vec![SelectionSlot::Selected, SelectionSlot::PendingDelete]
        );
        assert!(selection.slots_holding(bob.id).is_empty());
        assert_eq!(selection.editing(), Some(ann));
    }

    #[test]
    fn test_failed_replace_keeps_selection() {
        let mut store = seeded();
        let mut selection = SelectionBuffer::new();
        let bob = store.get(EntityId::new(2)).unwrap();
        selection.select(&bob);
        let result = store.replace_all_releasing(
            vec![
                user(7, "A", "a@x.com", UserStatus::Active),
                user(7, "B", "b@x.com", UserStatus::Active),
            ],
            &mut selection,
        );
        assert!(result.is_err());
        assert_eq!(selection.selected(), Some(bob));
    }

    #[test]
    fn test_setters_skip_notification_when_unchanged() {
        let mut store = seeded();
        let mut rx = store.subscribe();
        store.set_search_term("");
        store.set_tab(UserTab::All);
        assert!(!rx.has_changed().unwrap());
        store.set_search_term("bob");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search_term, "bob");
    }
}
