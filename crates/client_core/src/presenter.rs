//! Presentation collaborators the session drives: the image-source action
//! sheet, a loading indicator and user-facing error notices.

use async_trait::async_trait;
use shared::error::ErrorReport;

pub const IMAGE_SOURCE_HEADER: &str = "Select Image Source";
pub const LOADING_FILES_MESSAGE: &str = "Loading data ....";
pub const UPLOADING_MESSAGE: &str = "Uploading image ....";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetChoice {
    Gallery,
    Camera,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetButton {
    pub text: &'static str,
    pub choice: SheetChoice,
    pub role: Option<ButtonRole>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSheet {
    pub header: &'static str,
    pub buttons: Vec<SheetButton>,
}

impl ActionSheet {
    pub fn image_source() -> Self {
        Self {
            header: IMAGE_SOURCE_HEADER,
            buttons: vec![
                SheetButton {
                    text: "Select Image from Gallery",
                    choice: SheetChoice::Gallery,
                    role: None,
                },
                SheetButton {
                    text: "Select Camera",
                    choice: SheetChoice::Camera,
                    role: None,
                },
                SheetButton {
                    text: "Cancel",
                    choice: SheetChoice::Cancel,
                    role: Some(ButtonRole::Cancel),
                },
            ],
        }
    }
}

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Dismissing the sheet without picking a button counts as [`SheetChoice::Cancel`].
    async fn present_action_sheet(&self, sheet: &ActionSheet) -> SheetChoice;
    async fn present_loading(&self, message: &str);
    async fn dismiss_loading(&self);
    async fn notify_error(&self, report: &ErrorReport);
}

/// Headless presenter: cancels every sheet and shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPresenter;

#[async_trait]
impl Presenter for SilentPresenter {
    async fn present_action_sheet(&self, _sheet: &ActionSheet) -> SheetChoice {
        SheetChoice::Cancel
    }

    async fn present_loading(&self, _message: &str) {}

    async fn dismiss_loading(&self) {}

    async fn notify_error(&self, _report: &ErrorReport) {}
}
