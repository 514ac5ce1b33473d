//! Configuration loading for the Refboard console.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use crate::media::MediaPattern;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "REFBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub pagination: PaginationConfig,
    pub upload: UploadConfig,
    pub alerts: AlertConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    pub users_page_size: usize,
    pub notifications_page_size: usize,
    pub videos_page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Accepted media type patterns, e.g. `video/*`.
    pub accept: Vec<String>,
    pub tick_ms: u64,
    /// Progress percentage added per tick.
    pub step: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertConfig {
    /// Hide alerts automatically after this many milliseconds (optional).
    pub auto_dismiss_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Simulated latency of the mock persistence collaborator.
    pub delay_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or REFBOARD_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Local development settings: 10 rows per page, video uploads, instant seed.
    pub fn development() -> Self {
        Self {
            pagination: PaginationConfig {
                users_page_size: 10,
                notifications_page_size: 10,
                videos_page_size: 12,
            },
            upload: UploadConfig {
                accept: vec!["video/*".to_string()],
                tick_ms: 200,
                step: 10,
            },
            alerts: AlertConfig {
                auto_dismiss_ms: Some(4_000),
            },
            seed: SeedConfig { delay_ms: 0 },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let page_sizes = [
            ("pagination.users_page_size", self.pagination.users_page_size),
            (
                "pagination.notifications_page_size",
                self.pagination.notifications_page_size,
            ),
            ("pagination.videos_page_size", self.pagination.videos_page_size),
        ];
        for (field, size) in page_sizes {
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be > 0".to_string(),
                });
            }
        }
        if self.upload.accept.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "upload.accept",
                reason: "at least one media type pattern is required".to_string(),
            });
        }
        self.upload.accept_patterns()?;
        if self.upload.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upload.tick_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.upload.step == 0 || self.upload.step > 100 {
            return Err(ConfigError::InvalidValue {
                field: "upload.step",
                reason: "must be within 1..=100".to_string(),
            });
        }
        if self.alerts.auto_dismiss_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "alerts.auto_dismiss_ms",
                reason: "must be > 0 when set".to_string(),
            });
        }
        Ok(())
    }
}

impl PaginationConfig {
    pub fn users(&self) -> NonZeroUsize {
        non_zero(self.users_page_size)
    }

    pub fn notifications(&self) -> NonZeroUsize {
        non_zero(self.notifications_page_size)
    }

    pub fn videos(&self) -> NonZeroUsize {
        non_zero(self.videos_page_size)
    }
}

impl UploadConfig {
    pub fn accept_patterns(&self) -> Result<Vec<MediaPattern>, ConfigError> {
        self.accept
            .iter()
            .map(|raw| {
                raw.parse::<MediaPattern>()
                    .map_err(|err| ConfigError::InvalidValue {
                        field: "upload.accept",
                        reason: err.to_string(),
                    })
            })
            .collect()
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl AlertConfig {
    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.auto_dismiss_ms.map(Duration::from_millis)
    }
}

impl SeedConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn non_zero(size: usize) -> NonZeroUsize {
    NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
