//! Terminal rendition of the session's presentation collaborators.

use async_trait::async_trait;
use client_core::{ActionSheet, Presenter, SheetChoice};
use shared::error::ErrorReport;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Default)]
pub struct TerminalPresenter;

/// Maps a 1-based menu answer onto the sheet's buttons; anything else cancels.
pub fn parse_choice(sheet: &ActionSheet, answer: &str) -> SheetChoice {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| sheet.buttons.get(index))
        .map(|button| button.choice)
        .unwrap_or(SheetChoice::Cancel)
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn present_action_sheet(&self, sheet: &ActionSheet) -> SheetChoice {
        eprintln!("{}", sheet.header);
        for (index, button) in sheet.buttons.iter().enumerate() {
            eprintln!("  {}) {}", index + 1, button.text);
        }
        eprint!("> ");

        let mut answer = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(error) = stdin.read_line(&mut answer).await {
            tracing::warn!(%error, "failed to read menu choice");
            return SheetChoice::Cancel;
        }
        parse_choice(sheet, &answer)
    }

    async fn present_loading(&self, message: &str) {
        tracing::info!("{message}");
    }

    async fn dismiss_loading(&self) {}

    async fn notify_error(&self, report: &ErrorReport) {
        eprintln!("error: {}", report.message);
    }
}
