//! Host environments turn a capture reference into a photo payload.
//!
//! The environment is picked once at startup: a native shell reads the photo
//! straight from the device filesystem, a browser-hosted shell fetches it over
//! HTTP. Both return the same normalized [`DataUrl`].

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Directory, PhotoReference},
    protocol::DataUrl,
};
use storage::LocalStore;
use tracing::debug;

use crate::error::PhotoError;

const FALLBACK_MIME: &str = "application/octet-stream";

#[async_trait]
pub trait HostEnvironment: Send + Sync {
    fn kind(&self) -> HostKind;
    async fn resolve_photo(&self, reference: &PhotoReference) -> Result<DataUrl, PhotoError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    #[default]
    Native,
    Web,
}

impl HostKind {
    pub fn build(self, store: Arc<dyn LocalStore>, http: Client) -> Arc<dyn HostEnvironment> {
        match self {
            HostKind::Native => Arc::new(NativeHost::new(store)),
            HostKind::Web => Arc::new(WebHost::new(http)),
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKind::Native => f.write_str("native"),
            HostKind::Web => f.write_str("web"),
        }
    }
}

impl FromStr for HostKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "native" | "hybrid" => Ok(HostKind::Native),
            "web" | "browser" => Ok(HostKind::Web),
            other => Err(format!("unknown host kind '{other}' (expected native or web)")),
        }
    }
}

/// Reads the photo from its native device path through the local store.
pub struct NativeHost {
    store: Arc<dyn LocalStore>,
}

impl NativeHost {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HostEnvironment for NativeHost {
    fn kind(&self) -> HostKind {
        HostKind::Native
    }

    async fn resolve_photo(&self, reference: &PhotoReference) -> Result<DataUrl, PhotoError> {
        let path = reference
            .path
            .as_ref()
            .ok_or(PhotoError::InvalidReference("native path"))?;
        let path = path.to_string_lossy().into_owned();

        let payload = self
            .store
            .read(Directory::Root, &path)
            .await
            .map_err(|source| PhotoError::StorageReadFailed {
                path: path.clone(),
                source,
            })?;

        debug!(%path, size = payload.len(), "host: resolved native photo");
        Ok(DataUrl::new(reference.mime_type(), payload))
    }
}

/// Fetches the photo from its web-accessible URL.
pub struct WebHost {
    http: Client,
}

impl WebHost {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HostEnvironment for WebHost {
    fn kind(&self) -> HostKind {
        HostKind::Web
    }

    async fn resolve_photo(&self, reference: &PhotoReference) -> Result<DataUrl, PhotoError> {
        let url = reference
            .web_path
            .as_ref()
            .ok_or(PhotoError::InvalidReference("web path"))?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| PhotoError::CaptureFetchFailed {
                url: url.clone(),
                source,
            })?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| {
                mime_guess::from_path(url.path())
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|source| PhotoError::CaptureFetchFailed {
                url: url.clone(),
                source,
            })?;

        debug!(%url, %mime_type, size = bytes.len(), "host: fetched web photo");
        Ok(DataUrl::from_bytes(mime_type, &bytes))
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
