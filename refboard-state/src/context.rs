//! Application-wide state container.

use crate::alert::AlertCenter;
use crate::error::ConsoleResult;
use crate::page::{EntityPage, EntityScope, PageEntity};
use crate::seed;
use crate::source::{EntitySource, MockSource};
use crate::visibility::{ModalKey, UiVisibility};
use crate::widgets::{Dropdown, SidebarSection, SidebarState, UploadTask};
use chrono::Local;
use refboard_core::{
    ConfigError, ConsoleConfig, Notification, NotificationPatch, StoreResult, User, Video,
    VideoPatch, VideoStatus,
};
use std::time::Duration;
use tokio::runtime::Handle;

/// The persistence collaborators for every collection.
pub struct Sources {
    pub users: Box<dyn EntitySource<User>>,
    pub notifications: Box<dyn EntitySource<Notification>>,
    pub videos: Box<dyn EntitySource<Video>>,
}

impl Sources {
    /// Demo data served after `delay`.
    pub fn mock(delay: Duration) -> Self {
        Self {
            users: Box::new(MockSource::new(seed::users(), delay)),
            notifications: Box::new(MockSource::new(seed::notifications(), delay)),
            videos: Box::new(MockSource::new(seed::videos(), delay)),
        }
    }
}

/// One console session.
///
/// Built explicitly from a config and a runtime handle; background timers
/// (upload progress, alert auto-dismiss) are spawned on that handle.
#[derive(Debug)]
pub struct AppContext {
    config: ConsoleConfig,
    pub user_scope: EntityScope<User>,
    pub notification_scope: EntityScope<Notification>,
    pub video_scope: EntityScope<Video>,
    pub modals: UiVisibility,
    pub alerts: AlertCenter,
    pub sidebar: SidebarState,
    pub recipients: Dropdown,
    pub upload: UploadTask,
}

impl AppContext {
    pub fn new(config: ConsoleConfig, runtime: Handle) -> Result<Self, ConfigError> {
        config.validate()?;
        let alerts = match config.alerts.auto_dismiss() {
            Some(after) => AlertCenter::with_auto_dismiss(runtime.clone(), after),
            None => AlertCenter::new(),
        };
        let upload = UploadTask::new(&config.upload, runtime)?;
        Ok(Self {
            user_scope: EntityScope::new(config.pagination.users()),
            notification_scope: EntityScope::new(config.pagination.notifications()),
            video_scope: EntityScope::new(config.pagination.videos()),
            modals: UiVisibility::new(),
            alerts,
            sidebar: SidebarState::new(),
            recipients: Dropdown::new(seed::recipient_groups()),
            upload,
            config,
        })
    }

    /// A context pre-filled with the demo records, without going through a
    /// source.
    pub fn seeded(config: ConsoleConfig, runtime: Handle) -> ConsoleResult<Self> {
        let mut context = Self::new(config, runtime)?;
        context.user_scope.store.replace_all(seed::users())?;
        context.notification_scope.store.replace_all(seed::notifications())?;
        context.video_scope.store.replace_all(seed::videos())?;
        Ok(context)
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn page<'a, E: PageEntity>(
        scope: &'a mut EntityScope<E>,
        modals: &'a mut UiVisibility,
        alerts: &'a mut AlertCenter,
    ) -> EntityPage<'a, E> {
        EntityPage::new(scope, modals, alerts)
    }

    pub fn users(&mut self) -> EntityPage<'_, User> {
        Self::page(&mut self.user_scope, &mut self.modals, &mut self.alerts)
    }

    pub fn notifications(&mut self) -> EntityPage<'_, Notification> {
        Self::page(&mut self.notification_scope, &mut self.modals, &mut self.alerts)
    }

    pub fn videos(&mut self) -> EntityPage<'_, Video> {
        Self::page(&mut self.video_scope, &mut self.modals, &mut self.alerts)
    }

    /// Fetch every collection concurrently. A failure is reported through
    /// the alert and returned. Dialogs showing a record that is gone after
    /// the reload are closed along with their selection slot.
    pub async fn load(&mut self, sources: &Sources) -> ConsoleResult<()> {
        let (users, notifications, videos) = tokio::join!(
            self.user_scope
                .store
                .load_from(sources.users.as_ref(), &mut self.user_scope.selection),
            self.notification_scope.store.load_from(
                sources.notifications.as_ref(),
                &mut self.notification_scope.selection
            ),
            self.video_scope
                .store
                .load_from(sources.videos.as_ref(), &mut self.video_scope.selection),
        );
        for (released, modals) in [
            (users.as_deref().unwrap_or_default(), User::MODALS),
            (notifications.as_deref().unwrap_or_default(), Notification::MODALS),
            (videos.as_deref().unwrap_or_default(), Video::MODALS),
        ] {
            for slot in released {
                self.modals.set(modals.for_slot(*slot), false);
            }
        }
        let loaded: ConsoleResult<()> = match (users, notifications, videos) {
            (Ok(_), Ok(_), Ok(_)) => Ok(()),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => Err(err),
        };
        match loaded {
            Ok(()) => {
                tracing::info!(
                    users = self.user_scope.store.len(),
                    notifications = self.notification_scope.store.len(),
                    videos = self.video_scope.store.len(),
                    "console data loaded"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "console data load failed");
                self.alerts.error(err.to_string());
                Err(err)
            }
        }
    }

    pub fn open_notification_create(&mut self) {
        self.recipients.reset();
        self.notifications().open_create();
    }

    pub fn close_notification_create(&mut self) {
        self.recipients.reset();
        self.notifications().close_create();
    }

    /// Create a notification, taking recipients from the recipient dropdown
    /// when the patch leaves them out and dating it today when undated.
    pub fn submit_notification(&mut self, mut patch: NotificationPatch) -> StoreResult<Notification> {
        if patch.recipients.is_none() {
            let selected = self.recipients.selected_values();
            if !selected.is_empty() {
                patch.recipients = Some(selected.join(","));
            }
        }
        if patch.date.is_none() {
            patch.date = Some(Local::now().date_naive());
        }
        let created = self.notifications().submit_create(&patch)?;
        self.recipients.reset();
        Ok(created)
    }

    pub fn open_upload(&mut self) {
        self.upload.reset();
        self.videos().open_create();
    }

    pub fn close_upload(&mut self) {
        self.upload.reset();
        self.videos().close_create();
    }

    /// Turn a completed upload into a video record. `Ok(None)` while the
    /// upload has not completed.
    pub fn finish_upload(&mut self, mut patch: VideoPatch) -> StoreResult<Option<Video>> {
        let snapshot = self.upload.snapshot();
        if !snapshot.is_complete() {
            tracing::debug!(phase = ?snapshot.phase, "finish ignored: upload not complete");
            return Ok(None);
        }
        let Some(file) = snapshot.file else {
            return Ok(None);
        };
        if patch.title.is_none() {
            patch.title = Some(file.stem().to_string());
        }
        if patch.status.is_none() {
            patch.status = Some(VideoStatus::Processing);
        }
        patch.file_name = Some(file.name.clone());
        patch.size_bytes = Some(file.size_bytes);

        let created = self.videos().submit_create(&patch)?;
        self.upload.reset();
        Ok(Some(created))
    }

    /// Close every dialog and drop every transient copy.
    pub fn close_all_modals(&mut self) {
        self.modals.close_all();
        self.user_scope.selection.clear_all();
        self.notification_scope.selection.clear_all();
        self.video_scope.selection.clear_all();
        self.recipients.reset();
        self.upload.reset();
    }

    pub fn navigate(&mut self, section: SidebarSection) {
        self.close_all_modals();
        self.sidebar.set_active(section);
    }

    pub fn toggle_mobile_sidebar(&mut self) -> bool {
        self.modals.toggle(ModalKey::MobileSidebar)
    }
}
