//! Coordination between an entity collection, its dialogs and the alert.
//!
//! An [`EntityPage`] is a short-lived borrow of one entity's scope plus the
//! shared visibility registry and alert. Every dialog opening pairs a
//! selection write with exactly one visibility flag; every close pairs the
//! flag with clearing the slot. Store failures become an error alert and
//! leave the initiating dialog open.

use crate::alert::AlertCenter;
use crate::export::{self, ExportError};
use crate::pagination::{Page, Pager};
use crate::selection::{SelectionBuffer, SelectionSlot};
use crate::store::{CollectionStats, EntityStore};
use crate::visibility::{ModalKey, UiVisibility};
use refboard_core::{
    Entity, EntityId, Notification, StoreError, StoreResult, User, ValidationError, Video,
};
use serde_json::Value;
use std::num::NonZeroUsize;

/// Dialog keys for one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityModals {
    pub detail: ModalKey,
    pub edit: ModalKey,
    pub delete: ModalKey,
    pub create: ModalKey,
}

impl EntityModals {
    pub fn for_slot(&self, slot: SelectionSlot) -> ModalKey {
        match slot {
            SelectionSlot::Selected => self.detail,
            SelectionSlot::Editing => self.edit,
            SelectionSlot::PendingDelete => self.delete,
        }
    }
}

/// An entity with its own table page.
pub trait PageEntity: Entity {
    const MODALS: EntityModals;
}

impl PageEntity for User {
    const MODALS: EntityModals = EntityModals {
        detail: ModalKey::UserDetail,
        edit: ModalKey::UserEdit,
        delete: ModalKey::UserDelete,
        create: ModalKey::UserCreate,
    };
}

impl PageEntity for Notification {
    const MODALS: EntityModals = EntityModals {
        detail: ModalKey::NotificationDetail,
        edit: ModalKey::NotificationEdit,
        delete: ModalKey::NotificationDelete,
        create: ModalKey::NotificationCreate,
    };
}

impl PageEntity for Video {
    const MODALS: EntityModals = EntityModals {
        detail: ModalKey::VideoDetail,
        edit: ModalKey::VideoEdit,
        delete: ModalKey::VideoDelete,
        create: ModalKey::VideoUpload,
    };
}

/// Everything owned per entity type.
#[derive(Debug)]
pub struct EntityScope<E: Entity> {
    pub store: EntityStore<E>,
    pub selection: SelectionBuffer<E>,
    pub pager: Pager,
}

impl<E: Entity> EntityScope<E> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            store: EntityStore::new(),
            selection: SelectionBuffer::new(),
            pager: Pager::new(page_size),
        }
    }
}

pub struct EntityPage<'a, E: PageEntity> {
    scope: &'a mut EntityScope<E>,
    modals: &'a mut UiVisibility,
    alerts: &'a mut AlertCenter,
}

impl<'a, E: PageEntity> EntityPage<'a, E> {
    pub fn new(
        scope: &'a mut EntityScope<E>,
        modals: &'a mut UiVisibility,
        alerts: &'a mut AlertCenter,
    ) -> Self {
        Self {
            scope,
            modals,
            alerts,
        }
    }

    pub fn store(&self) -> &EntityStore<E> {
        &self.scope.store
    }

    pub fn selection(&self) -> &SelectionBuffer<E> {
        &self.scope.selection
    }

    fn find(&mut self, id: EntityId) -> StoreResult<E> {
        match self.scope.store.get(id) {
            Some(entity) => Ok(entity),
            None => Err(self.report(StoreError::not_found(E::KIND, id))),
        }
    }

    fn report(&mut self, err: StoreError) -> StoreError {
        self.alerts.error(err.to_string());
        err
    }

    pub fn open_detail(&mut self, id: EntityId) -> StoreResult<()> {
        let entity = self.find(id)?;
        self.scope.selection.select(&entity);
        self.modals.set(E::MODALS.detail, true);
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.close_slot(SelectionSlot::Selected);
    }

    pub fn open_edit(&mut self, id: EntityId) -> StoreResult<()> {
        let entity = self.find(id)?;
        self.scope.selection.start_edit(&entity);
        self.modals.set(E::MODALS.edit, true);
        Ok(())
    }

    /// Change one field of the record being edited. Rejected paths or values
    /// raise an error alert.
    pub fn update_field(&mut self, path: &str, value: Value) -> Result<bool, ValidationError> {
        self.scope
            .selection
            .update_editing_field(path, value)
            .inspect_err(|err| self.alerts.error(err.to_string()))
    }

    pub fn save_edit(&mut self) -> StoreResult<Option<E>> {
        match self.scope.selection.commit_edit(&mut self.scope.store) {
            Ok(Some(saved)) => {
                self.modals.set(E::MODALS.edit, false);
                self.alerts
                    .success(format!("{} updated successfully", E::KIND.label()));
                Ok(Some(saved))
            }
            Ok(None) => Ok(None),
            Err(err) => Err(self.report(err)),
        }
    }

    pub fn close_edit(&mut self) {
        self.close_slot(SelectionSlot::Editing);
    }

    pub fn open_delete(&mut self, id: EntityId) -> StoreResult<()> {
        let entity = self.find(id)?;
        self.scope.selection.mark_for_delete(&entity);
        self.modals.set(E::MODALS.delete, true);
        Ok(())
    }

    /// Delete the record pending confirmation. Dialogs showing that record
    /// close along with the confirmation.
    pub fn confirm_delete(&mut self) -> StoreResult<Option<E>> {
        let Some(pending) = self.scope.selection.pending_delete() else {
            tracing::debug!(kind = %E::KIND, "delete confirmation ignored: nothing pending");
            return Ok(None);
        };
        let id = pending.id();
        let holding = self.scope.selection.slots_holding(id);
        match self.scope.store.delete(id, &mut self.scope.selection) {
            Ok(removed) => {
                for slot in holding {
                    self.modals.set(E::MODALS.for_slot(slot), false);
                }
                self.alerts
                    .success(format!("{} deleted successfully", E::KIND.label()));
                Ok(Some(removed))
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.close_slot(SelectionSlot::PendingDelete);
    }

    pub fn open_create(&mut self) {
        self.modals.set(E::MODALS.create, true);
    }

    pub fn close_create(&mut self) {
        self.modals.set(E::MODALS.create, false);
    }

    pub fn submit_create(&mut self, patch: &E::Patch) -> StoreResult<E> {
        match self.scope.store.create(patch) {
            Ok(created) => {
                self.modals.set(E::MODALS.create, false);
                self.alerts
                    .success(format!("{} created successfully", E::KIND.label()));
                Ok(created)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn close_slot(&mut self, slot: SelectionSlot) {
        self.modals.set(E::MODALS.for_slot(slot), false);
        self.scope.selection.clear(slot);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.scope.store.set_search_term(term);
        self.scope.pager.reset();
    }

    pub fn set_tab(&mut self, tab: E::Tab) {
        self.scope.store.set_tab(tab);
        self.scope.pager.reset();
    }

    pub fn go_to_page(&mut self, requested: i64) -> usize {
        let count = self.scope.store.filtered_len();
        self.scope.pager.go_to_page(requested, count)
    }

    pub fn next_page(&mut self) -> usize {
        let count = self.scope.store.filtered_len();
        self.scope.pager.next_page(count)
    }

    pub fn previous_page(&mut self) -> usize {
        let count = self.scope.store.filtered_len();
        self.scope.pager.previous_page(count)
    }

    /// Current page of the filtered view.
    pub fn page(&mut self) -> Page<E> {
        let filtered = self.scope.store.filtered_view();
        self.scope.pager.view(&filtered)
    }

    pub fn stats(&self) -> CollectionStats<E::Tab> {
        self.scope.store.stats()
    }
}

impl EntityPage<'_, Notification> {
    /// CSV of the notifications in the current filtered view.
    pub fn export_csv(&mut self) -> Result<String, ExportError> {
        let rows = self.scope.store.filtered_view();
        match export::to_csv(&rows) {
            Ok(csv) => {
                tracing::info!(rows = rows.len(), "notification export ready");
                Ok(csv)
            }
            Err(err) => {
                self.alerts.error(err.to_string());
                Err(err)
            }
        }
    }
}
