use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    domain::PhotoRecord,
    error::DomainError,
};

/// Multipart field the upload endpoint expects the photo under.
pub const UPLOAD_FIELD_NAME: &str = "file";

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Self-describing photo payload: `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    /// Wraps an already base64-encoded payload.
    pub fn new(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Bare base64 payload without the data-url header.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>, DomainError> {
        Ok(STANDARD.decode(self.payload.as_bytes())?)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DATA_URL_SCHEME}{}{BASE64_MARKER}{}",
            self.mime_type, self.payload
        )
    }
}

impl FromStr for DataUrl {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw
            .strip_prefix(DATA_URL_SCHEME)
            .ok_or_else(|| DomainError::MalformedDataUrl("missing 'data:' scheme".into()))?;
        let (mime_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| DomainError::MalformedDataUrl("missing ';base64,' marker".into()))?;
        if mime_type.is_empty() {
            return Err(DomainError::MalformedDataUrl("empty mime type".into()));
        }
        Ok(Self::new(mime_type, payload))
    }
}

impl TryFrom<String> for DataUrl {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataUrl> for String {
    fn from(value: DataUrl) -> Self {
        value.to_string()
    }
}

/// One-file multipart submission handed to a transfer provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MultipartUpload {
    pub fn from_record(record: &PhotoRecord) -> Result<Self, DomainError> {
        Ok(Self {
            field_name: UPLOAD_FIELD_NAME.to_string(),
            file_name: record.name.to_string(),
            mime_type: record.data.mime_type().to_string(),
            bytes: record.data.decode()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub file_name: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
