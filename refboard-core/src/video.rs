//! Match and training videos uploaded to the platform.

use crate::entity::{merge, require_text};
use crate::{Entity, EntityId, EntityKind, FilterTab, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCategory {
    #[default]
    MatchFootage,
    Training,
    Assessment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    #[default]
    Processing,
    Published,
    Archived,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub category: VideoCategory,
    pub uploaded_by: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub duration_secs: u32,
    pub status: VideoStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<VideoCategory>,
    pub uploaded_by: Option<String>,
    pub file_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub duration_secs: Option<u32>,
    pub status: Option<VideoStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoTab {
    #[default]
    All,
    Processing,
    Published,
    Archived,
}

impl FilterTab for VideoTab {
    fn all() -> &'static [Self] {
        &[
            VideoTab::All,
            VideoTab::Processing,
            VideoTab::Published,
            VideoTab::Archived,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            VideoTab::All => "All Videos",
            VideoTab::Processing => "Processing",
            VideoTab::Published => "Published",
            VideoTab::Archived => "Archived",
        }
    }
}

impl Entity for Video {
    type Patch = VideoPatch;
    type Tab = VideoTab;

    const KIND: EntityKind = EntityKind::Video;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn apply_patch(&mut self, patch: &VideoPatch) {
        merge(&mut self.title, &patch.title);
        merge(&mut self.description, &patch.description);
        merge(&mut self.category, &patch.category);
        merge(&mut self.uploaded_by, &patch.uploaded_by);
        merge(&mut self.file_name, &patch.file_name);
        merge(&mut self.size_bytes, &patch.size_bytes);
        merge(&mut self.duration_secs, &patch.duration_secs);
        merge(&mut self.status, &patch.status);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("file_name", &self.file_name)?;
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.uploaded_by.as_str(),
            self.file_name.as_str(),
        ]
    }

    fn matches_tab(&self, tab: VideoTab) -> bool {
        match tab {
            VideoTab::All => true,
            VideoTab::Processing => self.status == VideoStatus::Processing,
            VideoTab::Published => self.status == VideoStatus::Published,
            VideoTab::Archived => self.status == VideoStatus::Archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_file_name() {
        let video = Video {
            title: "Derby".to_string(),
            ..Video::default()
        };
        assert_eq!(video.validate(), Err(ValidationError::missing("file_name")));
    }

    #[test]
    fn test_search_covers_file_name() {
        let video = Video {
            id: EntityId::new(12),
            title: "Derby".to_string(),
            file_name: "derby_cam2.mp4".to_string(),
            ..Video::default()
        };
        assert!(video.matches_search("CAM2"));
        assert!(video.matches_search("12"));
        assert!(!video.matches_search("final"));
    }
}
