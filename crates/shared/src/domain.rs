use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{error::DomainError, protocol::DataUrl};

/// Directory, relative to [`Directory::Data`], that holds every stored photo.
pub const IMAGE_DIR: &str = "stored-images";

pub const PHOTO_EXTENSION: &str = "jpeg";
pub const DEFAULT_PHOTO_MIME: &str = "image/jpeg";

/// Storage-relative path of a photo file inside [`IMAGE_DIR`].
pub fn image_path(name: &PhotoName) -> String {
    format!("{IMAGE_DIR}/{}", name.as_str())
}

/// File name of a stored photo. Names never contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoName(String);

impl PhotoName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty()
            || raw.contains('/')
            || raw.contains('\\')
            || raw == "."
            || raw == ".."
        {
            return Err(DomainError::InvalidPhotoName(raw));
        }
        Ok(Self(raw))
    }

    /// `<epoch-millis>.jpeg`
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(format!("{}.{PHOTO_EXTENSION}", at.timestamp_millis()))
    }

    pub fn now() -> Self {
        Self::from_timestamp(Utc::now())
    }

    /// Millisecond timestamp encoded in the name, if it follows the capture naming scheme.
    pub fn timestamp_millis(&self) -> Option<i64> {
        let stem = self.0.strip_suffix(&format!(".{PHOTO_EXTENSION}"))?;
        if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhotoName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhotoName> for String {
    fn from(value: PhotoName) -> Self {
        value.0
    }
}

/// A stored photo as seen by the session at the last listing refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub name: PhotoName,
    /// Path relative to [`Directory::Data`].
    pub path: String,
    pub data: DataUrl,
}

impl PhotoRecord {
    pub fn new(name: PhotoName, data: DataUrl) -> Self {
        let path = image_path(&name);
        Self { name, path, data }
    }
}

/// Handle to a photo produced by a capture provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoReference {
    /// Absolute path on the device, available when running natively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// URL the photo can be fetched from, available when browser-hosted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_path: Option<Url>,
    pub format: String,
}

impl PhotoReference {
    pub fn native(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or(PHOTO_EXTENSION)
            .to_ascii_lowercase();
        Self {
            path: Some(path),
            web_path: None,
            format,
        }
    }

    pub fn web(url: Url) -> Self {
        let format = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(|last| last.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| PHOTO_EXTENSION.to_string());
        Self {
            path: None,
            web_path: Some(url),
            format,
        }
    }

    /// MIME type implied by the reference's format, falling back to JPEG.
    pub fn mime_type(&self) -> String {
        mime_guess::from_ext(&self.format)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| DEFAULT_PHOTO_MIME.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureResultType {
    Uri,
    Base64,
    DataUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    Camera,
    Photos,
    Prompt,
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Camera => f.write_str("camera"),
            CaptureSource::Photos => f.write_str("gallery"),
            CaptureSource::Prompt => f.write_str("prompt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub quality: u8,
    pub allow_editing: bool,
    pub result_type: CaptureResultType,
    pub source: CaptureSource,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            allow_editing: false,
            result_type: CaptureResultType::Uri,
            source: CaptureSource::Camera,
        }
    }
}

/// Storage area a local store path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directory {
    Data,
    Documents,
    Cache,
    /// Paths are absolute device paths.
    Root,
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Directory::Data => "data",
            Directory::Documents => "documents",
            Directory::Cache => "cache",
            Directory::Root => "root",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
