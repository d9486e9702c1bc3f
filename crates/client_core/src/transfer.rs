//! Upload of a single stored photo to a remote endpoint.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{MultipartUpload, TransferReceipt};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid mime type '{0}'")]
    InvalidMime(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server rejected upload with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait TransferProvider: Send + Sync {
    async fn submit(&self, upload: MultipartUpload) -> Result<TransferReceipt, TransferError>;
}

/// Posts the upload as `multipart/form-data` to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransferProvider {
    http: Client,
    endpoint: Url,
}

impl HttpTransferProvider {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl TransferProvider for HttpTransferProvider {
    async fn submit(&self, upload: MultipartUpload) -> Result<TransferReceipt, TransferError> {
        let MultipartUpload {
            field_name,
            file_name,
            mime_type,
            bytes,
        } = upload;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&mime_type)
            .map_err(|_| TransferError::InvalidMime(mime_type.clone()))?;
        let form = Form::new().part(field_name, part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TransferError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint = %self.endpoint, %file_name, size, status = status.as_u16(), "transfer: upload accepted");
        Ok(TransferReceipt {
            file_name,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "tests/transfer_tests.rs"]
mod tests;
