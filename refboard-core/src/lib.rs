//! Refboard Core - Entity Types
//!
//! Data types shared by every Refboard crate: identifiers, the entity
//! records managed by the console, their patches and filter tabs, the
//! error taxonomy and configuration. No store or coordination logic lives
//! here.

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod media;
pub mod notification;
pub mod user;
pub mod video;

pub use config::{
    AlertConfig, ConfigError, ConsoleConfig, PaginationConfig, SeedConfig, UploadConfig,
};
pub use entity::{Entity, FilterTab};
pub use error::{StoreError, StoreResult, ValidationError};
pub use identity::{EntityId, EntityKind};
pub use media::{MediaPattern, MediaPatternError};
pub use notification::{Notification, NotificationPatch, NotificationStatus, NotificationTab};
pub use user::{PermissionsPatch, User, UserPatch, UserPermissions, UserRole, UserStatus, UserTab};
pub use video::{Video, VideoCategory, VideoPatch, VideoStatus, VideoTab};
