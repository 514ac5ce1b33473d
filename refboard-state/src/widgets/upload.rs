//! File upload dialog state with a simulated progress timer.

use crate::observable::Observable;
use crate::scheduler::ScheduledTask;
use refboard_core::{ConfigError, MediaPattern, UploadConfig};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size_bytes,
        }
    }

    /// File name without its extension, used as a default video title.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSnapshot {
    pub file: Option<UploadFile>,
    pub drag_active: bool,
    pub phase: UploadPhase,
    /// Percentage in `0..=100`.
    pub progress: u8,
    generation: u64,
}

impl UploadSnapshot {
    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn is_complete(&self) -> bool {
        self.phase == UploadPhase::Complete
    }
}

/// Advance the upload started as `generation` by one tick. `None` when that
/// upload is no longer the one in flight.
fn advance_current(
    snapshot: &mut UploadSnapshot,
    generation: u64,
    step: u8,
) -> Option<ControlFlow<()>> {
    if !snapshot.is_uploading() || snapshot.generation != generation {
        return None;
    }
    Some(advance(snapshot, step))
}

/// Advance an in-flight upload by one tick.
fn advance(snapshot: &mut UploadSnapshot, step: u8) -> ControlFlow<()> {
    snapshot.progress = snapshot.progress.saturating_add(step).min(100);
    if snapshot.progress == 100 {
        snapshot.phase = UploadPhase::Complete;
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

/// State machine `Idle -> FileSelected -> Uploading -> Complete`.
///
/// Owns at most one progress timer. The timer is aborted on `reset`, on a
/// new file selection and when the task is dropped.
#[derive(Debug)]
pub struct UploadTask {
    state: Arc<Observable<UploadSnapshot>>,
    accept: Vec<MediaPattern>,
    tick: Duration,
    step: u8,
    runtime: Handle,
    timer: Option<ScheduledTask>,
}

impl UploadTask {
    pub fn new(config: &UploadConfig, runtime: Handle) -> Result<Self, ConfigError> {
        Ok(Self {
            state: Arc::new(Observable::default()),
            accept: config.accept_patterns()?,
            tick: config.tick(),
            step: config.step.clamp(1, 100),
            runtime,
            timer: None,
        })
    }

    pub fn accepts(&self, media_type: &str) -> bool {
        self.accept.iter().any(|pattern| pattern.matches(media_type))
    }

    /// Take `file` as the upload candidate. Returns `false` (and changes
    /// nothing) when the type is not accepted or an upload is in flight.
    pub fn select_file(&mut self, file: UploadFile) -> bool {
        if self.state.read(UploadSnapshot::is_uploading) {
            tracing::debug!(file = %file.name, "file selection ignored while uploading");
            return false;
        }
        if !self.accepts(&file.media_type) {
            tracing::warn!(file = %file.name, media_type = %file.media_type, "file type not accepted");
            return false;
        }
        self.timer = None;
        tracing::debug!(file = %file.name, size = file.size_bytes, "file selected");
        self.state.mutate(|state| {
            state.file = Some(file);
            state.phase = UploadPhase::FileSelected;
            state.progress = 0;
        });
        true
    }

    pub fn set_drag_active(&mut self, active: bool) {
        self.state.mutate_if(|state| {
            let changed = state.drag_active != active;
            state.drag_active = active;
            changed
        });
    }

    pub fn drop_file(&mut self, file: UploadFile) -> bool {
        self.set_drag_active(false);
        self.select_file(file)
    }

    /// Start the progress timer. A no-op unless a file is selected and no
    /// upload has run for it yet.
    pub fn begin_upload(&mut self) -> bool {
        let phase = self.state.read(|state| state.phase);
        if phase != UploadPhase::FileSelected {
            tracing::debug!(?phase, "upload start ignored");
            return false;
        }
        let generation = self.state.mutate(|state| {
            state.generation += 1;
            state.phase = UploadPhase::Uploading;
            state.progress = 0;
            state.generation
        });

        let state = Arc::clone(&self.state);
        let step = self.step;
        self.timer = Some(ScheduledTask::every(&self.runtime, self.tick, move || {
            let mut flow = ControlFlow::Break(());
            // A tick already running when its timer was aborted lands here
            // with a stale generation.
            state.mutate_if(|snapshot| match advance_current(snapshot, generation, step) {
                Some(next) => {
                    flow = next;
                    true
                }
                None => false,
            });
            if flow.is_break() {
                tracing::debug!("upload progress complete");
            }
            flow
        }));
        tracing::info!(tick_ms = self.tick.as_millis() as u64, step, "upload started");
        true
    }

    pub fn reset(&mut self) {
        self.timer = None;
        self.state.mutate_if(|state| {
            let idle = UploadSnapshot {
                generation: state.generation,
                ..UploadSnapshot::default()
            };
            let changed = *state != idle;
            *state = idle;
            changed
        });
    }

    /// Whether a progress timer is still scheduled.
    pub fn is_timer_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.state.subscribe()
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size on a 1024 ladder, two decimals at most.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
