//! Platform notifications sent to referees.

use crate::entity::{merge, require_text};
use crate::{Entity, EntityId, EntityKind, FilterTab, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Scheduled,
    #[default]
    Draft,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Sent => "sent",
            NotificationStatus::Scheduled => "scheduled",
            NotificationStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    pub assigned_to: String,
    pub date: NaiveDate,
    pub status: NotificationStatus,
    /// Recipient groups, comma separated when more than one.
    pub recipients: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub assigned_to: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<NotificationStatus>,
    pub recipients: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationTab {
    #[default]
    All,
    Sent,
    Scheduled,
    Draft,
}

impl FilterTab for NotificationTab {
    fn all() -> &'static [Self] {
        &[
            NotificationTab::All,
            NotificationTab::Sent,
            NotificationTab::Scheduled,
            NotificationTab::Draft,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            NotificationTab::All => "All",
            NotificationTab::Sent => "Sent",
            NotificationTab::Scheduled => "Scheduled",
            NotificationTab::Draft => "Drafts",
        }
    }
}

impl Entity for Notification {
    type Patch = NotificationPatch;
    type Tab = NotificationTab;

    const KIND: EntityKind = EntityKind::Notification;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply_patch(&mut self, patch: &NotificationPatch) {
        merge(&mut self.title, &patch.title);
        merge(&mut self.message, &patch.message);
        merge(&mut self.assigned_to, &patch.assigned_to);
        merge(&mut self.date, &patch.date);
        merge(&mut self.status, &patch.status);
        merge(&mut self.recipients, &patch.recipients);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("message", &self.message)?;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.message.as_str(),
            self.assigned_to.as_str(),
        ]
    }

    fn matches_tab(&self, tab: NotificationTab) -> bool {
        match tab {
            NotificationTab::All => true,
            NotificationTab::Sent => self.status == NotificationStatus::Sent,
            NotificationTab::Scheduled => self.status == NotificationStatus::Scheduled,
            NotificationTab::Draft => self.status == NotificationStatus::Draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_title_and_message() {
        let mut notification = Notification::default();
        assert_eq!(
            notification.validate(),
            Err(ValidationError::missing("title"))
        );
        notification.title = "Kickoff".to_string();
        assert_eq!(
            notification.validate(),
            Err(ValidationError::missing("message"))
        );
        notification.message = "Season starts".to_string();
        assert!(notification.validate().is_ok());
    }

    #[test]
    fn test_date_serializes_as_iso_day() {
        let notification = Notification {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            ..Notification::default()
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_status_tabs() {
        let notification = Notification {
            status: NotificationStatus::Scheduled,
            ..Notification::default()
        };
        assert!(notification.matches_tab(NotificationTab::All));
        assert!(notification.matches_tab(NotificationTab::Scheduled));
        assert!(!notification.matches_tab(NotificationTab::Sent));
    }
}
