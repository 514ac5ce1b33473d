//! Open/closed flags for every modal and overlay in the console.

use crate::observable::Observable;
use std::fmt;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModalKey {
    UserDetail,
    UserEdit,
    UserDelete,
    UserCreate,
    NotificationDetail,
    NotificationEdit,
    NotificationDelete,
    NotificationCreate,
    VideoDetail,
    VideoEdit,
    VideoDelete,
    VideoUpload,
    MobileSidebar,
}

impl ModalKey {
    pub const COUNT: usize = 13;

    pub const ALL: [ModalKey; ModalKey::COUNT] = [
        ModalKey::UserDetail,
        ModalKey::UserEdit,
        ModalKey::UserDelete,
        ModalKey::UserCreate,
        ModalKey::NotificationDetail,
        ModalKey::NotificationEdit,
        ModalKey::NotificationDelete,
        ModalKey::NotificationCreate,
        ModalKey::VideoDetail,
        ModalKey::VideoEdit,
        ModalKey::VideoDelete,
        ModalKey::VideoUpload,
        ModalKey::MobileSidebar,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModalKey::UserDetail => "user_detail",
            ModalKey::UserEdit => "user_edit",
            ModalKey::UserDelete => "user_delete",
            ModalKey::UserCreate => "user_create",
            ModalKey::NotificationDetail => "notification_detail",
            ModalKey::NotificationEdit => "notification_edit",
            ModalKey::NotificationDelete => "notification_delete",
            ModalKey::NotificationCreate => "notification_create",
            ModalKey::VideoDetail => "video_detail",
            ModalKey::VideoEdit => "video_edit",
            ModalKey::VideoDelete => "video_delete",
            ModalKey::VideoUpload => "video_upload",
            ModalKey::MobileSidebar => "mobile_sidebar",
        }
    }
}

impl fmt::Display for ModalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilitySnapshot {
    open: [bool; ModalKey::COUNT],
}

impl VisibilitySnapshot {
    pub fn is_open(&self, key: ModalKey) -> bool {
        self.open[key.index()]
    }

    pub fn open_keys(&self) -> Vec<ModalKey> {
        ModalKey::ALL
            .into_iter()
            .filter(|key| self.is_open(*key))
            .collect()
    }
}

/// Registry of modal flags; unknown keys are unrepresentable.
#[derive(Debug, Default)]
pub struct UiVisibility {
    state: Observable<VisibilitySnapshot>,
}

impl UiVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: ModalKey, open: bool) {
        let changed = self.state.mutate_if(|state| {
            let slot = &mut state.open[key.index()];
            let changed = *slot != open;
            *slot = open;
            changed
        });
        if changed {
            tracing::debug!(%key, open, "modal visibility changed");
        }
    }

    pub fn get(&self, key: ModalKey) -> bool {
        self.state.read(|state| state.is_open(key))
    }

    pub fn toggle(&mut self, key: ModalKey) -> bool {
        let open = !self.get(key);
        self.set(key, open);
        open
    }

    pub fn close_all(&mut self) {
        self.state.mutate_if(|state| {
            let any_open = state.open.iter().any(|open| *open);
            state.open = [false; ModalKey::COUNT];
            any_open
        });
    }

    pub fn open_keys(&self) -> Vec<ModalKey> {
        self.state.read(VisibilitySnapshot::open_keys)
    }

    pub fn snapshot(&self) -> VisibilitySnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<VisibilitySnapshot> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_have_distinct_slots() {
        for (position, key) in ModalKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), position);
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut modals = UiVisibility::new();
        assert!(!modals.get(ModalKey::UserEdit));
        modals.set(ModalKey::UserEdit, true);
        assert!(modals.get(ModalKey::UserEdit));
        assert!(!modals.get(ModalKey::UserDetail));
        assert_eq!(modals.open_keys(), vec![ModalKey::UserEdit]);
    }

    #[test]
    fn test_redundant_set_does_not_notify() {
        let mut modals = UiVisibility::new();
        let mut rx = modals.subscribe();
        modals.set(ModalKey::VideoUpload, false);
        assert!(!rx.has_changed().unwrap());
        modals.set(ModalKey::VideoUpload, true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_open(ModalKey::VideoUpload));
    }

    #[test]
    fn test_close_all() {
        let mut modals = UiVisibility::new();
        modals.set(ModalKey::NotificationCreate, true);
        modals.toggle(ModalKey::MobileSidebar);
        assert_eq!(modals.open_keys().len(), 2);
        modals.close_all();
        assert!(modals.open_keys().is_empty());
    }
}
