//! Persistence collaborator seam.
//!
//! Stores load their collections through [`EntitySource`]. The console ships
//! with [`MockSource`], which serves seed data after a simulated delay; a
//! network client implements the same trait.

use async_trait::async_trait;
use refboard_core::{Entity, EntityKind};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{kind} source unavailable: {reason}")]
    Unavailable { kind: EntityKind, reason: String },
}

#[async_trait]
pub trait EntitySource<E: Entity>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<E>, SourceError>;
}

#[derive(Debug, Clone)]
pub struct MockSource<E> {
    records: Vec<E>,
    delay: Duration,
    failure: Option<String>,
}

impl<E: Entity> MockSource<E> {
    pub fn new(records: Vec<E>, delay: Duration) -> Self {
        Self {
            records,
            delay,
            failure: None,
        }
    }

    /// A source whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>, delay: Duration) -> Self {
        Self {
            records: Vec::new(),
            delay,
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl<E: Entity> EntitySource<E> for MockSource<E> {
    async fn fetch_all(&self) -> Result<Vec<E>, SourceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(reason) => Err(SourceError::Unavailable {
                kind: E::KIND,
                reason: reason.clone(),
            }),
            None => Ok(self.records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refboard_core::Video;

    #[tokio::test(start_paused = true)]
    async fn test_mock_waits_for_delay() {
        let source = MockSource::new(vec![Video::default()], Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        let records = source.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = MockSource::<Video>::failing("offline", Duration::ZERO);
        let err = source.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "video source unavailable: offline");
    }
}
