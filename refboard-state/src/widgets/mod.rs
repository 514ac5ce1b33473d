//! Transient widget state that does not belong to an entity collection.

pub mod dropdown;
pub mod sidebar;
pub mod upload;

pub use dropdown::{Dropdown, DropdownOption, DropdownSnapshot};
pub use sidebar::{SidebarSection, SidebarSnapshot, SidebarState};
pub use upload::{format_size, UploadFile, UploadPhase, UploadSnapshot, UploadTask};
