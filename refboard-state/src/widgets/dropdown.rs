//! Searchable multi-select dropdown (e.g. notification recipients).

use crate::observable::Observable;
use std::collections::BTreeSet;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownSnapshot {
    pub open: bool,
    pub search_term: String,
    pub options: Vec<DropdownOption>,
    pub selected: BTreeSet<String>,
}

impl DropdownSnapshot {
    /// Options whose label contains the search term, ignoring case.
    pub fn visible_options(&self) -> Vec<DropdownOption> {
        let needle = self.search_term.trim().to_lowercase();
        self.options
            .iter()
            .filter(|option| needle.is_empty() || option.label.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Selected values in option order.
    pub fn selected_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| self.selected.contains(&option.value))
            .map(|option| option.value.clone())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Dropdown {
    state: Observable<DropdownSnapshot>,
}

impl Dropdown {
    pub fn new(options: Vec<DropdownOption>) -> Self {
        Self {
            state: Observable::new(DropdownSnapshot {
                options,
                ..DropdownSnapshot::default()
            }),
        }
    }

    pub fn open(&mut self) {
        self.state.mutate_if(|state| !std::mem::replace(&mut state.open, true));
    }

    /// Close and forget the search term; the selection is kept.
    pub fn close(&mut self) {
        self.state.mutate_if(|state| {
            let changed = state.open || !state.search_term.is_empty();
            state.open = false;
            state.search_term.clear();
            changed
        });
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_open() {
            self.close();
            false
        } else {
            self.open();
            true
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.read(|state| state.open)
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

    pub fn visible_options(&self) -> Vec<DropdownOption> {
        self.state.read(DropdownSnapshot::visible_options)
    }

    /// Flip selection of `value`. Unknown values are ignored and return `false`.
    pub fn toggle_option(&mut self, value: &str) -> bool {
        let known = self.state.read(|state| state.options.iter().any(|o| o.value == value));
        if !known {
            tracing::debug!(value, "unknown dropdown option ignored");
            return false;
        }
        self.state.mutate(|state| {
            if !state.selected.remove(value) {
                state.selected.insert(value.to_string());
            }
        });
        true
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.state.read(|state| state.selected.contains(value))
    }

    pub fn select_all_visible(&mut self) {
        self.state.mutate_if(|state| {
            let mut changed = false;
            for option in state.visible_options() {
                changed |= state.selected.insert(option.value);
            }
            changed
        });
    }

    pub fn clear_selection(&mut self) {
        self.state.mutate_if(|state| {
            let any = !state.selected.is_empty();
            state.selected.clear();
            any
        });
    }

    pub fn selected_values(&self) -> Vec<String> {
        self.state.read(DropdownSnapshot::selected_values)
    }

    /// Labels of the selected options joined with ", ".
    pub fn selected_summary(&self) -> String {
        self.state.read(|state| {
            state
                .options
                .iter()
                .filter(|option| state.selected.contains(&option.value))
                .map(|option| option.label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
    }

    /// Swap the option list, dropping selections that no longer exist.
    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        self.state.mutate(|state| {
            state
                .selected
                .retain(|value| options.iter().any(|option| &option.value == value));
            state.options = options;
        });
    }

    /// Closed, no search, nothing selected; options are kept.
    pub fn reset(&mut self) {
        self.state.mutate_if(|state| {
            let changed = state.open || !state.search_term.is_empty() || !state.selected.is_empty();
            state.open = false;
            state.search_term.clear();
            state.selected.clear();
            changed
        });
    }

    pub fn snapshot(&self) -> DropdownSnapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DropdownSnapshot> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipients() -> Dropdown {
        Dropdown::new(vec![
            DropdownOption::new("all", "All Referees"),
            DropdownOption::new("grade1", "Grade 1 Referees"),
            DropdownOption::new("assessors", "Assessors"),
        ])
    }

    #[test]
    fn test_close_clears_search_but_keeps_selection() {
        let mut dropdown = recipients();
        dropdown.open();
        dropdown.set_search_term("grade");
        dropdown.toggle_option("grade1");
        dropdown.close();
        let snapshot = dropdown.snapshot();
        assert!(!snapshot.open);
        assert!(snapshot.search_term.is_empty());
        assert_eq!(dropdown.selected_values(), vec!["grade1".to_string()]);
    }

    #[test]
    fn test_visible_options_filter_by_label() {
        let mut dropdown = recipients();
        dropdown.set_search_term("REFEREES");
        let values: Vec<String> = dropdown
            .visible_options()
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["all".to_string(), "grade1".to_string()]);
    }

    #[test]
    fn test_selected_values_follow_option_order() {
        let mut dropdown = recipients();
        assert!(dropdown.toggle_option("assessors"));
        assert!(dropdown.toggle_option("all"));
        assert_eq!(
            dropdown.selected_values(),
            vec!["all".to_string(), "assessors".to_string()]
        );
        assert_eq!(dropdown.selected_summary(), "All Referees, Assessors");
        assert!(dropdown.toggle_option("all"));
        assert!(!dropdown.is_selected("all"));
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let mut dropdown = recipients();
        let mut rx = dropdown.subscribe();
        assert!(!dropdown.toggle_option("coaches"));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_select_all_visible_respects_filter() {
        let mut dropdown = recipients();
        dropdown.set_search_term("assess");
        dropdown.select_all_visible();
        assert_eq!(dropdown.selected_values(), vec!["assessors".to_string()]);
        dropdown.clear_selection();
        assert!(dropdown.selected_values().is_empty());
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut dropdown = recipients();
        assert!(dropdown.toggle());
        dropdown.toggle_option("all");
        dropdown.reset();
        let snapshot = dropdown.snapshot();
        assert!(!snapshot.open);
        assert!(snapshot.selected.is_empty());
        assert_eq!(snapshot.options.len(), 3);
    }

    #[test]
    fn test_set_options_drops_stale_selection() {
        let mut dropdown = recipients();
        dropdown.toggle_option("grade1");
        dropdown.toggle_option("all");
        dropdown.set_options(vec![DropdownOption::new("all", "Everyone")]);
        assert_eq!(dropdown.selected_values(), vec!["all".to_string()]);
    }
}
