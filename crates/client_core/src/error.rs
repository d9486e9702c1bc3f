use shared::{
    domain::CaptureSource,
    error::{DomainError, ErrorKind, ErrorReport},
};
use storage::StoreError;
use thiserror::Error;
use url::Url;

use crate::{capture::CaptureError, transfer::TransferError};

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("failed to fetch captured photo from {url}: {source}")]
    CaptureFetchFailed {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("photo reference has no {0}")]
    InvalidReference(&'static str),
    #[error("{0} selection is not implemented")]
    SourceNotImplemented(CaptureSource),
    #[error("failed to write photo '{path}': {source}")]
    StorageWriteFailed {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to read photo '{path}': {source}")]
    StorageReadFailed {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to list '{path}': {source}")]
    StorageListFailed {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreateFailed {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to delete photo '{path}': {source}")]
    StorageDeleteFailed {
        path: String,
        #[source]
        source: StoreError,
    },
    #[error("invalid photo payload: {0}")]
    InvalidPayload(#[from] DomainError),
    #[error("upload of '{file_name}' failed: {source}")]
    TransferFailed {
        file_name: String,
        #[source]
        source: TransferError,
    },
}

impl PhotoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhotoError::Capture(_) | PhotoError::CaptureFetchFailed { .. } => {
                ErrorKind::CaptureFailed
            }
            PhotoError::InvalidReference(_) => ErrorKind::InvalidReference,
            PhotoError::SourceNotImplemented(_) => ErrorKind::NotImplemented,
            PhotoError::StorageWriteFailed { .. } => ErrorKind::StorageWriteFailed,
            PhotoError::StorageReadFailed { .. } => ErrorKind::StorageReadFailed,
            PhotoError::StorageListFailed { .. } => ErrorKind::StorageListFailed,
            PhotoError::DirectoryCreateFailed { .. } => ErrorKind::DirectoryCreateFailed,
            PhotoError::StorageDeleteFailed { .. } => ErrorKind::StorageDeleteFailed,
            PhotoError::InvalidPayload(_) => ErrorKind::InvalidPayload,
            PhotoError::TransferFailed { .. } => ErrorKind::TransferFailed,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::new(self.kind(), self.to_string())
    }
}
