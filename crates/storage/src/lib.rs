use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::{
    io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use shared::domain::Directory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("path '{0}' escapes its storage directory")]
    PathEscapesRoot(String),
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
    #[error("could not determine the platform {0} directory")]
    NoPlatformDir(Directory),
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Directory-scoped file access keyed by name. Payloads cross this boundary as
/// standard base64; bytes on disk are raw.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Writes a decoded payload, creating missing parent directories. Returns the
    /// absolute location of the written file.
    async fn write(&self, directory: Directory, path: &str, payload_b64: &str) -> Result<PathBuf>;
    async fn read(&self, directory: Directory, path: &str) -> Result<String>;
    /// File names directly inside `path`, sorted.
    async fn list(&self, directory: Directory, path: &str) -> Result<Vec<String>>;
    async fn make_directory(&self, directory: Directory, path: &str) -> Result<()>;
    async fn delete(&self, directory: Directory, path: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRoots {
    pub data: PathBuf,
    pub documents: PathBuf,
    pub cache: PathBuf,
}

impl DirectoryRoots {
    /// Lays every storage area out as a sub-directory of `base`.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            data: base.join("data"),
            documents: base.join("documents"),
            cache: base.join("cache"),
        }
    }

    /// The per-user platform location of `directory`, scoped to `app_name`.
    /// [`Directory::Root`] has no platform location.
    pub fn platform_dir(directory: Directory, app_name: &str) -> Result<PathBuf> {
        let base = match directory {
            Directory::Data => dirs::data_dir(),
            Directory::Documents => dirs::document_dir(),
            Directory::Cache => dirs::cache_dir(),
            Directory::Root => None,
        };
        base.map(|base| base.join(app_name))
            .ok_or(StoreError::NoPlatformDir(directory))
    }

    fn root(&self, directory: Directory) -> Option<&Path> {
        match directory {
            Directory::Data => Some(&self.data),
            Directory::Documents => Some(&self.documents),
            Directory::Cache => Some(&self.cache),
            Directory::Root => None,
        }
    }
}

/// [`LocalStore`] over the host filesystem.
#[derive(Debug, Clone)]
pub struct FsLocalStore {
    roots: DirectoryRoots,
}

impl FsLocalStore {
    pub fn new(roots: DirectoryRoots) -> Self {
        Self { roots }
    }

    /// Resolves `path` inside `directory`. Relative paths may only descend;
    /// [`Directory::Root`] takes absolute paths as they are.
    pub fn resolve(&self, directory: Directory, path: &str) -> Result<PathBuf> {
        let raw = Path::new(path);
        let Some(root) = self.roots.root(directory) else {
            if !raw.is_absolute() {
                return Err(StoreError::PathEscapesRoot(path.to_string()));
            }
            return Ok(raw.to_path_buf());
        };

        let mut resolved = root.to_path_buf();
        for component in raw.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StoreError::PathEscapesRoot(path.to_string()));
                }
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
impl LocalStore for FsLocalStore {
    async fn write(&self, directory: Directory, path: &str, payload_b64: &str) -> Result<PathBuf> {
        let target = self.resolve(directory, path)?;
        let bytes = STANDARD.decode(payload_b64.as_bytes())?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&target, &bytes)
            .await
            .map_err(|e| StoreError::io(&target, e))?;

        debug!(%directory, path, size = bytes.len(), "store: wrote file");
        Ok(target)
    }

    async fn read(&self, directory: Directory, path: &str) -> Result<String> {
        let target = self.resolve(directory, path)?;
        let bytes = fs::read(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::FileNotFound(target.clone()),
            _ => StoreError::io(&target, e),
        })?;

        debug!(%directory, path, size = bytes.len(), "store: read file");
        Ok(STANDARD.encode(bytes))
    }

    async fn list(&self, directory: Directory, path: &str) -> Result<Vec<String>> {
        let target = self.resolve(directory, path)?;
        let mut entries = fs::read_dir(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::DirectoryNotFound(target.clone()),
            _ => StoreError::io(&target, e),
        })?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&target, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(&entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    warn!(
                        %directory,
                        path,
                        name = %raw.to_string_lossy(),
                        "store: skipping non UTF-8 file name"
                    );
                }
            }
        }
        names.sort();

        debug!(%directory, path, count = names.len(), "store: listed directory");
        Ok(names)
    }

    async fn make_directory(&self, directory: Directory, path: &str) -> Result<()> {
        let target = self.resolve(directory, path)?;
        fs::create_dir_all(&target)
            .await
            .map_err(|e| StoreError::io(&target, e))?;
        debug!(%directory, path, "store: created directory");
        Ok(())
    }

    async fn delete(&self, directory: Directory, path: &str) -> Result<()> {
        let target = self.resolve(directory, path)?;
        fs::remove_file(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::FileNotFound(target.clone()),
            _ => StoreError::io(&target, e),
        })?;
        debug!(%directory, path, "store: deleted file");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
