use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure categories reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CaptureFailed,
    InvalidReference,
    NotImplemented,
    StorageWriteFailed,
    StorageReadFailed,
    StorageListFailed,
    DirectoryCreateFailed,
    StorageDeleteFailed,
    InvalidPayload,
    TransferFailed,
}

impl ErrorKind {
    /// Kinds that must reach the user instead of only the log.
    pub fn is_user_facing(self) -> bool {
        matches!(self, ErrorKind::StorageWriteFailed | ErrorKind::TransferFailed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid photo name '{0}'")]
    InvalidPhotoName(String),
    #[error("malformed data url: {0}")]
    MalformedDataUrl(String),
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
