use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{
        image_path, CaptureConfig, CaptureSource, Directory, PhotoName, PhotoRecord,
        PhotoReference, DEFAULT_PHOTO_MIME, IMAGE_DIR,
    },
    protocol::{DataUrl, MultipartUpload, TransferReceipt},
};
use storage::{LocalStore, StoreError};
use tracing::{debug, error, info, warn};

pub mod capture;
pub mod error;
pub mod host;
pub mod presenter;
pub mod transfer;

pub use capture::{CaptureError, CaptureProvider, FixedCaptureProvider};
pub use error::PhotoError;
pub use host::{HostEnvironment, HostKind, NativeHost, WebHost};
pub use presenter::{ActionSheet, Presenter, SheetChoice, SilentPresenter};
pub use transfer::{HttpTransferProvider, TransferError, TransferProvider};

pub type Result<T> = std::result::Result<T, PhotoError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaptureOutcome {
    Cancelled,
    Persisted { name: PhotoName, path: String },
}

/// Owns the session's list of stored photos and sequences capture, storage,
/// listing, deletion and upload through the injected collaborators.
///
/// The list is a snapshot of the image directory taken at the last
/// [`refresh_list`](Self::refresh_list); the filesystem stays authoritative.
pub struct PhotoSessionController {
    store: Arc<dyn LocalStore>,
    host: Arc<dyn HostEnvironment>,
    capture: Arc<dyn CaptureProvider>,
    transfer: Arc<dyn TransferProvider>,
    presenter: Arc<dyn Presenter>,
    images: Vec<PhotoRecord>,
}

impl PhotoSessionController {
    pub fn new(
        store: Arc<dyn LocalStore>,
        host: Arc<dyn HostEnvironment>,
        capture: Arc<dyn CaptureProvider>,
        transfer: Arc<dyn TransferProvider>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            store,
            host,
            capture,
            transfer,
            presenter,
            images: Vec::new(),
        }
    }

    pub fn images(&self) -> &[PhotoRecord] {
        &self.images
    }

    pub fn find(&self, name: &str) -> Option<&PhotoRecord> {
        self.images.iter().find(|record| record.name.as_str() == name)
    }

    pub fn host_kind(&self) -> HostKind {
        self.host.kind()
    }

    /// Shows the image-source sheet and runs the chosen flow.
    pub async fn select_image_source(&mut self) -> Result<CaptureOutcome> {
        let sheet = ActionSheet::image_source();
        match self.presenter.present_action_sheet(&sheet).await {
            SheetChoice::Camera => self.capture_and_persist().await,
            SheetChoice::Gallery => {
                warn!("photos: gallery selection requested but not implemented");
                Err(PhotoError::SourceNotImplemented(CaptureSource::Photos))
            }
            SheetChoice::Cancel => {
                debug!("photos: image source sheet cancelled");
                Ok(CaptureOutcome::Cancelled)
            }
        }
    }

    /// Captures a photo, writes it under a timestamp name and refreshes the
    /// list so the new record is visible.
    pub async fn capture_and_persist(&mut self) -> Result<CaptureOutcome> {
        let config = CaptureConfig::default();
        let Some(reference) = self.capture.capture(&config).await? else {
            info!("photos: capture cancelled");
            return Ok(CaptureOutcome::Cancelled);
        };

        let data = self.resolve_payload(&reference).await?;
        let name = PhotoName::now();
        let path = image_path(&name);

        let written = self
            .store
            .write(Directory::Data, &path, data.payload())
            .await;
        if let Err(source) = written {
            return Err(self
                .surface(PhotoError::StorageWriteFailed { path, source })
                .await);
        }
        info!(%name, %path, mime_type = data.mime_type(), "photos: photo persisted");

        self.refresh_list().await?;
        Ok(CaptureOutcome::Persisted { name, path })
    }

    pub async fn resolve_payload(&self, reference: &PhotoReference) -> Result<DataUrl> {
        self.host.resolve_photo(reference).await
    }

    /// Replaces the list with the current contents of the image directory,
    /// creating the directory on first use. The loading indicator is dismissed
    /// once on every path.
    pub async fn refresh_list(&mut self) -> Result<()> {
        self.images.clear();
        self.presenter
            .present_loading(presenter::LOADING_FILES_MESSAGE)
            .await;
        let result = self.load_files().await;
        self.presenter.dismiss_loading().await;
        result
    }

    async fn load_files(&mut self) -> Result<()> {
        let names = match self.store.list(Directory::Data, IMAGE_DIR).await {
            Ok(names) => names,
            Err(StoreError::DirectoryNotFound(dir)) => {
                warn!(dir = %dir.display(), "photos: image directory missing, creating it");
                return self
                    .store
                    .make_directory(Directory::Data, IMAGE_DIR)
                    .await
                    .map_err(|source| PhotoError::DirectoryCreateFailed {
                        path: IMAGE_DIR.to_string(),
                        source,
                    });
            }
            Err(source) => {
                return Err(PhotoError::StorageListFailed {
                    path: IMAGE_DIR.to_string(),
                    source,
                })
            }
        };

        let names: Vec<PhotoName> = names
            .into_iter()
            .filter_map(|raw| match PhotoName::parse(raw) {
                Ok(name) => Some(name),
                Err(err) => {
                    warn!(%err, "photos: skipping unusable file name");
                    None
                }
            })
            .collect();
        self.hydrate_from_names(&names).await
    }

    /// Reads each named file in order and appends its record. Reads run one
    /// after another; the first failure stops hydration.
    pub async fn hydrate_from_names(&mut self, names: &[PhotoName]) -> Result<()> {
        for name in names {
            let path = image_path(name);
            let payload = self
                .store
                .read(Directory::Data, &path)
                .await
                .map_err(|source| PhotoError::StorageReadFailed {
                    path: path.clone(),
                    source,
                })?;

            debug!(%name, size = payload.len(), "photos: hydrated record");
            self.images.push(PhotoRecord {
                name: name.clone(),
                path,
                data: DataUrl::new(DEFAULT_PHOTO_MIME, payload),
            });
        }
        Ok(())
    }

    /// Removes the backing file, then refreshes. The list only reflects the
    /// deletion once that refresh completes.
    pub async fn delete_record(&mut self, record: &PhotoRecord) -> Result<()> {
        self.store
            .delete(Directory::Data, &record.path)
            .await
            .map_err(|source| PhotoError::StorageDeleteFailed {
                path: record.path.clone(),
                source,
            })?;
        info!(name = %record.name, "photos: photo deleted");

        self.refresh_list().await
    }

    /// Uploads a stored photo as the multipart field `file`.
    pub async fn transfer(&self, record: &PhotoRecord) -> Result<TransferReceipt> {
        let upload = MultipartUpload::from_record(record)?;
        let size = upload.bytes.len();

        self.presenter
            .present_loading(presenter::UPLOADING_MESSAGE)
            .await;
        let result = self.transfer.submit(upload).await;
        self.presenter.dismiss_loading().await;

        match result {
            Ok(receipt) => {
                info!(name = %record.name, size, status = receipt.status, "photos: photo uploaded");
                Ok(receipt)
            }
            Err(source) => Err(self
                .surface(PhotoError::TransferFailed {
                    file_name: record.name.to_string(),
                    source,
                })
                .await),
        }
    }

    async fn surface(&self, err: PhotoError) -> PhotoError {
        let report = err.report();
        error!(kind = ?report.kind, error = %err, "photos: operation failed");
        if report.kind.is_user_facing() {
            self.presenter.notify_error(&report).await;
        }
        err
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
