//! Single-slot toast for operation feedback.

use crate::observable::Observable;
use crate::scheduler::ScheduledTask;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlertLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Success => "success",
            AlertLevel::Warning => "warning",
            AlertLevel::Error => "error",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSnapshot {
    pub level: AlertLevel,
    /// Kept after `hide` so a closing animation can still render it.
    pub message: String,
    pub visible: bool,
    pub shown_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl AlertSnapshot {
    pub fn is_active(&self) -> bool {
        self.visible
    }
}

#[derive(Debug)]
pub struct AlertCenter {
    state: Arc<Observable<AlertSnapshot>>,
    auto_dismiss: Option<(Handle, Duration)>,
    dismiss_timer: Option<ScheduledTask>,
}

impl Default for AlertCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertCenter {
    /// Alerts stay up until `hide` is called.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Observable::default()),
            auto_dismiss: None,
            dismiss_timer: None,
        }
    }

    /// Alerts hide themselves `after` they were shown.
    pub fn with_auto_dismiss(runtime: Handle, after: Duration) -> Self {
        Self {
            auto_dismiss: Some((runtime, after)),
            ..Self::new()
        }
    }

    pub fn show(&mut self, level: AlertLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%level, %message, "alert shown");
        self.dismiss_timer = None;
        let generation = self.state.mutate(|state| {
            state.generation += 1;
            state.level = level;
            state.message = message;
            state.visible = true;
            state.shown_at = Some(Utc::now());
            state.generation
        });

        if let Some((runtime, after)) = &self.auto_dismiss {
            let state = Arc::clone(&self.state);
            self.dismiss_timer = Some(ScheduledTask::after(runtime, *after, move || {
                // A newer alert owns the slot once the generation moves on.
                state.mutate_if(|alert| {
                    let current = alert.visible && alert.generation == generation;
                    if current {
                        alert.visible = false;
                    }
                    current
                });
            }));
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(AlertLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(AlertLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(AlertLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(AlertLevel::Error, message);
    }

    pub fn hide(&mut self) {
        self.dismiss_timer = None;
        self.state.mutate_if(|state| std::mem::replace(&mut state.visible, false));
    }

    pub fn is_active(&self) -> bool {
        self.state.read(AlertSnapshot::is_active)
    }

    /// Level and message of the visible alert.
    pub fn current(&self) -> Option<(AlertLevel, String)> {
        self.state
            .read(|state| state.visible.then(|| (state.level, state.message.clone())))
    }

    pub fn snapshot(&self) -> AlertSnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AlertSnapshot> {
        self.state.subscribe()
    }
}
