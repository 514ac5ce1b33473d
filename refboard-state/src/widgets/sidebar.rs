//! Navigation sidebar sections and their expanded state.

use crate::observable::Observable;
use std::collections::BTreeSet;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SidebarSection {
    Users,
    Notifications,
    Videos,
    Settings,
}

impl SidebarSection {
    pub fn all() -> &'static [SidebarSection] {
        &[
            SidebarSection::Users,
            SidebarSection::Notifications,
            SidebarSection::Videos,
            SidebarSection::Settings,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            SidebarSection::Users => "User Management",
            SidebarSection::Notifications => "Notifications",
            SidebarSection::Videos => "Videos",
            SidebarSection::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> SidebarSection {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> SidebarSection {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarSnapshot {
    pub expanded: BTreeSet<SidebarSection>,
    pub active: Option<SidebarSection>,
}

#[derive(Debug, Default)]
pub struct SidebarState {
    state: Observable<SidebarSnapshot>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a section open or closed, returning whether it is now expanded.
    pub fn toggle(&mut self, section: SidebarSection) -> bool {
        self.state.mutate(|state| {
            if state.expanded.remove(&section) {
                false
            } else {
                state.expanded.insert(section);
                true
            }
        })
    }

    pub fn expand(&mut self, section: SidebarSection) {
        self.state.mutate_if(|state| state.expanded.insert(section));
    }

    pub fn collapse(&mut self, section: SidebarSection) {
        self.state.mutate_if(|state| state.expanded.remove(&section));
    }

    pub fn collapse_all(&mut self) {
        self.state.mutate_if(|state| {
            let any = !state.expanded.is_empty();
            state.expanded.clear();
            any
        });
    }

    pub fn is_expanded(&self, section: SidebarSection) -> bool {
        self.state.read(|state| state.expanded.contains(&section))
    }

    /// Mark `section` as the current page; its group is expanded with it.
    pub fn set_active(&mut self, section: SidebarSection) {
        self.state.mutate_if(|state| {
            let changed = state.active != Some(section) || !state.expanded.contains(&section);
            state.active = Some(section);
            state.expanded.insert(section);
            changed
        });
        tracing::debug!(section = section.title(), "sidebar section activated");
    }

    pub fn active(&self) -> Option<SidebarSection> {
        self.state.read(|state| state.active)
    }

    pub fn snapshot(&self) -> SidebarSnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SidebarSnapshot> {
        self.state.subscribe()
    }
}
