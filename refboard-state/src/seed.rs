//! Demo records served by the mock persistence collaborator.

use crate::widgets::DropdownOption;
use chrono::NaiveDate;
use refboard_core::{
    EntityId, Notification, NotificationStatus, User, UserPermissions, UserRole, UserStatus,
    Video, VideoCategory, VideoStatus,
};

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap_or_default()
}

fn user(
    id: u64,
    (first, last): (&str, &str),
    email: &str,
    organization: &str,
    role: UserRole,
    status: UserStatus,
) -> User {
    User {
        id: EntityId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        name: format!("{first} {last}"),
        email: email.to_string(),
        phone: format!("+1 555 01{id:02}"),
        organization: organization.to_string(),
        role,
        status,
        permissions: UserPermissions {
            account_is_active: status == UserStatus::Active,
            can_upload_videos: matches!(role, UserRole::Assessor | UserRole::Instructor),
            can_view_reports: role == UserRole::Assessor,
            can_receive_notifications: status != UserStatus::Deleted,
        },
    }
}

pub fn users() -> Vec<User> {
    use UserRole::*;
    use UserStatus::*;
    vec![
        user(1, ("John", "Smith"), "john.smith@refboard.io", "Northern League", Referee, Active),
        user(2, ("Maria", "Garcia"), "maria.garcia@refboard.io", "Northern League", Assessor, Active),
        user(3, ("David", "Chen"), "david.chen@refboard.io", "City FA", Referee, Inactive),
        user(4, ("Aisha", "Okafor"), "aisha.okafor@refboard.io", "City FA", Instructor, Active),
        user(5, ("Liam", "Murphy"), "liam.murphy@refboard.io", "Coastal Cup", Referee, Active),
        user(6, ("Sofia", "Rossi"), "sofia.rossi@refboard.io", "Coastal Cup", Observer, Deleted),
        user(7, ("Noah", "Kim"), "noah.kim@refboard.io", "Northern League", Referee, Active),
        user(8, ("Emma", "Novak"), "emma.novak@refboard.io", "Youth Division", Assessor, Inactive),
        user(9, ("Omar", "Haddad"), "omar.haddad@refboard.io", "Youth Division", Referee, Active),
        user(10, ("Chloe", "Martin"), "chloe.martin@refboard.io", "City FA", Referee, Active),
        user(11, ("Lucas", "Silva"), "lucas.silva@refboard.io", "Coastal Cup", Referee, Inactive),
        user(12, ("Grace", "Walsh"), "grace.walsh@refboard.io", "Northern League", Instructor, Active),
    ]
}

fn notification(
    id: u64,
    title: &str,
    message: &str,
    assigned_to: &str,
    date: NaiveDate,
    status: NotificationStatus,
    recipients: &str,
) -> Notification {
    Notification {
        id: EntityId::new(id),
        title: title.to_string(),
        message: message.to_string(),
        assigned_to: assigned_to.to_string(),
        date,
        status,
        recipients: recipients.to_string(),
    }
}

pub fn notifications() -> Vec<Notification> {
    use NotificationStatus::*;
    vec![
        notification(
            1,
            "Season kickoff briefing",
            "Mandatory briefing for all match officials before the opening round.",
            "Maria Garcia",
            day(2024, 8, 1),
            Sent,
            "all",
        ),
        notification(
            2,
            "Fitness test schedule",
            "Fitness tests run Saturday morning, bring your registration card.",
            "Aisha Okafor",
            day(2024, 8, 10),
            Scheduled,
            "grade1,grade2",
        ),
        notification(
            3,
            "Law changes 2024/25",
            "Summary of law amendments, including handball and offside clarifications.",
            "Grace Walsh",
            day(2024, 7, 20),
            Sent,
            "all",
        ),
        notification(
            4,
            "Assessment feedback window",
            "Assessors, please submit derby assessments within 48 hours.",
            "Maria Garcia",
            day(2024, 9, 2),
            Draft,
            "assessors",
        ),
        notification(
            5,
            "Youth tournament volunteers",
            "We need six officials for the youth tournament, reply if available.",
            "Emma Novak",
            day(2024, 9, 14),
            Scheduled,
            "youth",
        ),
        notification(
            6,
            "Kit collection",
            "New kits are ready for collection at the association office.",
            "John Smith",
            day(2024, 8, 25),
            Draft,
            "all",
        ),
    ]
}

fn video(
    id: u64,
    title: &str,
    category: VideoCategory,
    uploaded_by: &str,
    (file_name, size_bytes, duration_secs): (&str, u64, u32),
    status: VideoStatus,
) -> Video {
    Video {
        id: EntityId::new(id),
        title: title.to_string(),
        description: format!("{title} footage for review."),
        category,
        uploaded_by: uploaded_by.to_string(),
        file_name: file_name.to_string(),
        size_bytes,
        duration_secs,
        status,
    }
}

pub fn videos() -> Vec<Video> {
    use VideoCategory::*;
    use VideoStatus::*;
    vec![
        video(1, "City derby first half", MatchFootage, "Maria Garcia", ("derby_h1.mp4", 734_003_200, 2_820), Published),
        video(2, "Offside positioning drill", Training, "Aisha Okafor", ("offside_drill.mp4", 157_286_400, 640), Published),
        video(3, "Penalty area decisions", Assessment, "Grace Walsh", ("penalty_review.mov", 262_144_000, 1_210), Processing),
        video(4, "Cup semi-final", MatchFootage, "Emma Novak", ("cup_semi.mp4", 1_288_490_189, 5_640), Archived),
        video(5, "Communication with assistants", Training, "Aisha Okafor", ("ar_comms.mp4", 94_371_840, 480), Published),
    ]
}

/// Recipient groups offered when composing a notification.
pub fn recipient_groups() -> Vec<DropdownOption> {
    vec![
        DropdownOption::new("all", "All Referees"),
        DropdownOption::new("grade1", "Grade 1 Referees"),
        DropdownOption::new("grade2", "Grade 2 Referees"),
        DropdownOption::new("assessors", "Assessors"),
        DropdownOption::new("instructors", "Instructors"),
        DropdownOption::new("youth", "Youth Division"),
    ]
}
