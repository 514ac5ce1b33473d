//! Error aggregation for the console runtime.

use crate::export::ExportError;
use crate::source::SourceError;
use refboard_core::{ConfigError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Usage: {0}")]
    Usage(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
