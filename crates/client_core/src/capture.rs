//! Capture providers hand the session a reference to a freshly taken photo.

use async_trait::async_trait;
use shared::domain::{CaptureConfig, CaptureSource, PhotoReference};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture source '{0}' is unavailable")]
    SourceUnavailable(CaptureSource),
}

#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// `Ok(None)` means the user backed out; nothing should be persisted.
    async fn capture(&self, config: &CaptureConfig) -> Result<Option<PhotoReference>, CaptureError>;
}

/// Yields a photo chosen ahead of time, e.g. a path passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct FixedCaptureProvider {
    reference: Option<PhotoReference>,
}

impl FixedCaptureProvider {
    pub fn new(reference: PhotoReference) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CaptureProvider for FixedCaptureProvider {
    async fn capture(&self, config: &CaptureConfig) -> Result<Option<PhotoReference>, CaptureError> {
        if config.source != CaptureSource::Camera {
            return Err(CaptureError::SourceUnavailable(config.source));
        }
        debug!(
            quality = config.quality,
            allow_editing = config.allow_editing,
            result_type = ?config.result_type,
            cancelled = self.reference.is_none(),
            "capture: fixed provider invoked"
        );
        Ok(self.reference.clone())
    }
}
