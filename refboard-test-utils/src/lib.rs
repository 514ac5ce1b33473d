//! Refboard Test Utilities
//!
//! Shared test infrastructure for the Refboard workspace:
//! - Proptest generators for entities, patches and store operations
//! - Fixtures for configuration and common records

pub use refboard_core::{
    ConsoleConfig, Entity, EntityId, Notification, NotificationPatch, NotificationStatus,
    PermissionsPatch, User, UserPatch, UserRole, UserStatus, UserTab, Video, VideoPatch,
    VideoStatus,
};

pub mod generators {
    //! Proptest strategies for Refboard entity types.

    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    // === Field Generators ===

    pub fn arb_word() -> impl Strategy<Value = String> {
        "[A-Za-z]{1,10}"
    }

    /// Always passes email validation.
    pub fn arb_email() -> impl Strategy<Value = String> {
        ("[a-z]{1,8}", "[a-z]{1,8}").prop_map(|(local, domain)| format!("{local}@{domain}.org"))
    }

    pub fn arb_user_status() -> impl Strategy<Value = UserStatus> {
        prop_oneof![
            Just(UserStatus::Active),
            Just(UserStatus::Inactive),
            Just(UserStatus::Deleted),
        ]
    }

    pub fn arb_user_role() -> impl Strategy<Value = UserRole> {
        prop_oneof![
            Just(UserRole::Referee),
            Just(UserRole::Assessor),
            Just(UserRole::Instructor),
            Just(UserRole::Observer),
        ]
    }

    pub fn arb_user_tab() -> impl Strategy<Value = UserTab> {
        prop_oneof![
            Just(UserTab::All),
            Just(UserTab::Active),
            Just(UserTab::Inactive),
            Just(UserTab::Deleted),
        ]
    }

    pub fn arb_notification_status() -> impl Strategy<Value = NotificationStatus> {
        prop_oneof![
            Just(NotificationStatus::Sent),
            Just(NotificationStatus::Scheduled),
            Just(NotificationStatus::Draft),
        ]
    }

    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
    }

    /// Search terms biased towards substrings that appear in generated names.
    pub fn arb_search_term() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[a-zA-Z]{1,3}",
            "[0-9]{1,2}",
            Just("@".to_string()),
        ]
    }

    // === Patch Generators ===

    /// A patch that produces a valid user when applied over the defaults.
    pub fn arb_valid_user_patch() -> impl Strategy<Value = UserPatch> {
        (
            proptest::option::of(arb_word()),
            proptest::option::of(arb_word()),
            arb_word(),
            arb_email(),
            proptest::option::of(arb_user_role()),
            proptest::option::of(arb_user_status()),
        )
            .prop_map(|(first_name, last_name, name, email, role, status)| UserPatch {
                first_name,
                last_name,
                name: Some(name),
                email: Some(email),
                role,
                status,
                ..UserPatch::default()
            })
    }

    /// Any patch, including ones that fail validation (blank name, bad email).
    pub fn arb_user_patch() -> impl Strategy<Value = UserPatch> {
        (
            proptest::option::of(prop_oneof![arb_word(), Just(String::new())]),
            proptest::option::of(prop_oneof![arb_email(), Just("no-at-sign".to_string()), Just(String::new())]),
            proptest::option::of(arb_user_status()),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(name, email, status, can_view_reports)| UserPatch {
                name,
                email,
                status,
                permissions: can_view_reports.map(|value| PermissionsPatch {
                    can_view_reports: Some(value),
                    ..PermissionsPatch::default()
                }),
                ..UserPatch::default()
            })
    }

    pub fn arb_user() -> impl Strategy<Value = User> {
        (1u64..10_000, arb_valid_user_patch()).prop_map(|(id, patch)| {
            let mut user = User::default();
            user.apply_patch(&patch);
            user.refresh_derived();
            user.id = EntityId::new(id);
            user
        })
    }

    /// Users with distinct ids `1..=n` in shuffled order.
    pub fn arb_user_collection(max: usize) -> impl Strategy<Value = Vec<User>> {
        proptest::collection::vec(arb_valid_user_patch(), 0..=max)
            .prop_map(|patches| {
                patches
                    .into_iter()
                    .enumerate()
                    .map(|(index, patch)| {
                        let mut user = User::default();
                        user.apply_patch(&patch);
                        user.refresh_derived();
                        user.id = EntityId::new(index as u64 + 1);
                        user
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    }

    pub fn arb_notification_patch() -> impl Strategy<Value = NotificationPatch> {
        (
            proptest::option::of(arb_word()),
            proptest::option::of(arb_word()),
            proptest::option::of(arb_date()),
            proptest::option::of(arb_notification_status()),
        )
            .prop_map(|(title, message, date, status)| NotificationPatch {
                title,
                message,
                date,
                status,
                ..NotificationPatch::default()
            })
    }

    // === Store Operation Generators ===

    /// One user-store intent. Ids are small so that updates and deletes hit
    /// both existing and missing records.
    #[derive(Debug, Clone)]
    pub enum UserOp {
        Create(UserPatch),
        Update(u64, UserPatch),
        Delete(u64),
        Search(String),
        Tab(UserTab),
    }

    pub fn arb_user_op() -> impl Strategy<Value = UserOp> {
        prop_oneof![
            3 => arb_user_patch().prop_map(UserOp::Create),
            2 => (0u64..12, arb_user_patch()).prop_map(|(id, patch)| UserOp::Update(id, patch)),
            2 => (0u64..12).prop_map(UserOp::Delete),
            1 => arb_search_term().prop_map(UserOp::Search),
            1 => arb_user_tab().prop_map(UserOp::Tab),
        ]
    }

    /// One notification-store intent.
    #[derive(Debug, Clone)]
    pub enum NotificationOp {
        Create(NotificationPatch),
        Update(u64, NotificationPatch),
        Delete(u64),
    }

    pub fn arb_notification_op() -> impl Strategy<Value = NotificationOp> {
        prop_oneof![
            3 => arb_notification_patch().prop_map(NotificationOp::Create),
            2 => (0u64..10, arb_notification_patch())
                .prop_map(|(id, patch)| NotificationOp::Update(id, patch)),
            2 => (0u64..10).prop_map(NotificationOp::Delete),
        ]
    }
}

pub mod fixtures {
    //! Pre-built records and configuration.

    use super::*;
    use chrono::NaiveDate;

    /// Development settings with auto-dismiss disabled, so alerts stay put
    /// in assertions.
    pub fn config() -> ConsoleConfig {
        let mut config = ConsoleConfig::development();
        config.alerts.auto_dismiss_ms = None;
        config
    }

    pub fn user(id: u64, name: &str, email: &str, status: UserStatus) -> User {
        User {
            id: EntityId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            status,
            ..User::default()
        }
    }

    pub fn referees() -> Vec<User> {
        vec![
            user(1, "Ann Lee", "ann@refs.org", UserStatus::Active),
            user(2, "Bob Stone", "bob@refs.org", UserStatus::Inactive),
            user(3, "Cara Diaz", "cara@league.org", UserStatus::Active),
        ]
    }

    pub fn notification(id: u64, title: &str, status: NotificationStatus) -> Notification {
        Notification {
            id: EntityId::new(id),
            title: title.to_string(),
            message: format!("{title} details"),
            assigned_to: "Ops".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            status,
            recipients: "all".to_string(),
        }
    }

    pub fn video(id: u64, title: &str, status: VideoStatus) -> Video {
        Video {
            id: EntityId::new(id),
            title: title.to_string(),
            file_name: format!("{}.mp4", title.to_lowercase().replace(' ', "_")),
            status,
            ..Video::default()
        }
    }
}
