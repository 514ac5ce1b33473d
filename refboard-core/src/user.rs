//! External platform users (referees, assessors and their staff).

use crate::entity::{merge, require_text};
use crate::{Entity, EntityId, EntityKind, FilterTab, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Referee,
    Assessor,
    Instructor,
    Observer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Referee => "referee",
            UserRole::Assessor => "assessor",
            UserRole::Instructor => "instructor",
            UserRole::Observer => "observer",
        }
    }
}

/// Account lifecycle status. `Deleted` is a soft delete, distinct from an
/// account that is merely inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    pub account_is_active: bool,
    pub can_upload_videos: bool,
    pub can_view_reports: bool,
    pub can_receive_notifications: bool,
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self {
            account_is_active: true,
            can_upload_videos: false,
            can_view_reports: false,
            can_receive_notifications: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsPatch {
    pub account_is_active: Option<bool>,
    pub can_upload_videos: Option<bool>,
    pub can_view_reports: Option<bool>,
    pub can_receive_notifications: Option<bool>,
}

impl UserPermissions {
    fn apply(&mut self, patch: &PermissionsPatch) {
        merge(&mut self.account_is_active, &patch.account_is_active);
        merge(&mut self.can_upload_videos, &patch.can_upload_videos);
        merge(&mut self.can_view_reports, &patch.can_view_reports);
        merge(
            &mut self.can_receive_notifications,
            &patch.can_receive_notifications,
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    /// Display name. Derived from `first_name` and `last_name` whenever either
    /// is set; kept as supplied otherwise.
    pub name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub permissions: UserPermissions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub permissions: Option<PermissionsPatch>,
}

impl UserPatch {
    pub fn named(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserTab {
    #[default]
    All,
    Active,
    Inactive,
    Deleted,
}

impl FilterTab for UserTab {
    fn all() -> &'static [Self] {
        &[UserTab::All, UserTab::Active, UserTab::Inactive, UserTab::Deleted]
    }

    fn label(&self) -> &'static str {
        match self {
            UserTab::All => "All Users",
            UserTab::Active => "Active",
            UserTab::Inactive => "Inactive",
            UserTab::Deleted => "Deleted",
        }
    }
}

impl Entity for User {
    type Patch = UserPatch;
    type Tab = UserTab;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        merge(&mut self.first_name, &patch.first_name);
        merge(&mut self.last_name, &patch.last_name);
        merge(&mut self.name, &patch.name);
        merge(&mut self.email, &patch.email);
        merge(&mut self.phone, &patch.phone);
        merge(&mut self.organization, &patch.organization);
        merge(&mut self.role, &patch.role);
        merge(&mut self.status, &patch.status);
        if let Some(permissions) = &patch.permissions {
            self.permissions.apply(permissions);
        }
    }

    fn refresh_derived(&mut self) {
        let parts: Vec<&str> = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        if !parts.is_empty() {
            self.name = parts.join(" ");
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "must contain '@'"));
        }
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ]
    }

    fn matches_tab(&self, tab: UserTab) -> bool {
        match tab {
            UserTab::All => true,
            UserTab::Active => self.status == UserStatus::Active,
            UserTab::Inactive => self.status == UserStatus::Inactive,
            UserTab::Deleted => self.status == UserStatus::Deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ann() -> User {
        let mut user = User::default();
        user.apply_patch(&UserPatch {
            first_name: Some("Ann".to_string()),
            last_name: Some("Lee".to_string()),
            email: Some("ann@refs.org".to_string()),
            ..UserPatch::default()
        });
        user.refresh_derived();
        user
    }

    #[test]
    fn test_display_name_derived_from_parts() {
        let user = ann();
        assert_eq!(user.name, "Ann Lee");
    }

    #[test]
    fn test_display_name_kept_without_parts() {
        let mut user = User::default();
        user.apply_patch(&UserPatch::named("Ann", "a@x.com"));
        user.refresh_derived();
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn test_validate_rejects_missing_email() {
        let mut user = User::default();
        user.apply_patch(&UserPatch {
            name: Some("Ann".to_string()),
            ..UserPatch::default()
        });
        assert_eq!(user.validate(), Err(ValidationError::missing("email")));
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let mut user = User::default();
        user.apply_patch(&UserPatch::named("Ann", "not-an-email"));
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_nested_permissions_patch_preserves_siblings() {
        let mut user = ann();
        user.apply_patch(&UserPatch {
            permissions: Some(PermissionsPatch {
                can_view_reports: Some(true),
                ..PermissionsPatch::default()
            }),
            ..UserPatch::default()
        });
        assert!(user.permissions.can_view_reports);
        assert!(user.permissions.account_is_active);
        assert!(user.permissions.can_receive_notifications);
    }

    #[test]
    fn test_search_matches_email_case_insensitive() {
        let user = ann();
        assert!(user.matches_search("REFS.org"));
        assert!(user.matches_search("  "));
        assert!(!user.matches_search("bob"));
    }

    #[test]
    fn test_deleted_tab_is_distinct_from_inactive() {
        let mut user = ann();
        user.status = UserStatus::Inactive;
        user.permissions.account_is_active = false;
        assert!(user.matches_tab(UserTab::Inactive));
        assert!(!user.matches_tab(UserTab::Deleted));

        user.status = UserStatus::Deleted;
        assert!(user.matches_tab(UserTab::Deleted));
        assert!(!user.matches_tab(UserTab::Inactive));
    }

    proptest! {
        #[test]
        fn prop_search_ignores_case_and_padding(
            local in "[a-z]{1,8}",
            domain in "[a-z]{1,8}",
            start in 0usize..8,
            len in 1usize..6,
        ) {
            let email = format!("{local}@{domain}.org");
            let mut user = User::default();
            user.apply_patch(&UserPatch::named("Ann", email.as_str()));
            let start = start.min(email.len() - 1);
            let end = (start + len).min(email.len());
            let term = format!("  {} ", email[start..end].to_uppercase());
            prop_assert!(user.matches_search(&term));
        }
    }
}
