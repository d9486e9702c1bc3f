use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use client_core::HostKind;
use shared::domain::Directory;
use storage::DirectoryRoots;

pub const APP_NAME: &str = "photo-locker";
pub const CONFIG_FILE: &str = "photo-locker.toml";
pub const DEFAULT_UPLOAD_URL: &str = "http://127.0.0.1:8080/upload";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Storage areas. `None` falls back to the platform directory scoped to
    /// [`APP_NAME`], e.g. `dirs::data_dir()/photo-locker`.
    pub data_dir: Option<PathBuf>,
    pub documents_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub upload_url: String,
    pub host: HostKind,
    pub http_timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            documents_dir: None,
            cache_dir: None,
            upload_url: DEFAULT_UPLOAD_URL.into(),
            host: HostKind::Native,
            http_timeout_seconds: None,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat toml file at `path`, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("data_dir") {
                    settings.data_dir = Some(PathBuf::from(v));
                }
                if let Some(v) = file_cfg.get("documents_dir") {
                    settings.documents_dir = Some(PathBuf::from(v));
                }
                if let Some(v) = file_cfg.get("cache_dir") {
                    settings.cache_dir = Some(PathBuf::from(v));
                }
                if let Some(v) = file_cfg.get("upload_url") {
                    settings.upload_url = v.clone();
                }
                if let Some(v) = file_cfg.get("host") {
                    apply_host(&mut settings, v);
                }
                if let Some(v) = file_cfg.get("http_timeout_seconds") {
                    apply_timeout(&mut settings, v);
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("PHOTO_LOCKER_DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__DATA_DIR") {
        settings.data_dir = Some(PathBuf::from(v));
    }

    if let Some(v) = env("PHOTO_LOCKER_DOCUMENTS_DIR") {
        settings.documents_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__DOCUMENTS_DIR") {
        settings.documents_dir = Some(PathBuf::from(v));
    }

    if let Some(v) = env("PHOTO_LOCKER_CACHE_DIR") {
        settings.cache_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__CACHE_DIR") {
        settings.cache_dir = Some(PathBuf::from(v));
    }

    if let Some(v) = env("PHOTO_LOCKER_UPLOAD_URL") {
        settings.upload_url = v;
    }
    if let Some(v) = env("APP__UPLOAD_URL") {
        settings.upload_url = v;
    }

    if let Some(v) = env("PHOTO_LOCKER_HOST") {
        apply_host(&mut settings, &v);
    }

    if let Some(v) = env("APP__HTTP_TIMEOUT_SECONDS") {
        apply_timeout(&mut settings, &v);
    }

    settings
}

impl Settings {
    /// Configured areas as they are; unset ones resolve to platform directories.
    pub fn directory_roots(&self) -> storage::Result<DirectoryRoots> {
        Ok(DirectoryRoots {
            data: area_or_platform(self.data_dir.as_ref(), Directory::Data)?,
            documents: area_or_platform(self.documents_dir.as_ref(), Directory::Documents)?,
            cache: area_or_platform(self.cache_dir.as_ref(), Directory::Cache)?,
        })
    }
}

fn area_or_platform(
    configured: Option<&PathBuf>,
    directory: Directory,
) -> storage::Result<PathBuf> {
    match configured {
        Some(path) => Ok(path.clone()),
        None => DirectoryRoots::platform_dir(directory, APP_NAME),
    }
}

fn apply_host(settings: &mut Settings, raw: &str) {
    match raw.parse::<HostKind>() {
        Ok(host) => settings.host = host,
        Err(error) => tracing::warn!(%error, "invalid host setting, keeping {}", settings.host),
    }
}

fn apply_timeout(settings: &mut Settings, raw: &str) {
    if let Ok(parsed) = raw.trim().parse::<u64>() {
        settings.http_timeout_seconds = (parsed > 0).then_some(parsed);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
