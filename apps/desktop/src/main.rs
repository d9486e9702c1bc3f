use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    CaptureOutcome, FixedCaptureProvider, HostKind, HttpTransferProvider, PhotoSessionController,
    Presenter, SilentPresenter,
};
use shared::domain::PhotoReference;
use storage::{FsLocalStore, LocalStore};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

mod config;
mod terminal;

use config::{load_settings, Settings, APP_NAME};
use terminal::TerminalPresenter;

#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = "Capture, store, list and upload photos")]
struct Cli {
    /// Data area holding `stored-images/` (overrides settings).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    upload_url: Option<String>,
    /// `native` reads photos from device paths, `web` fetches them by URL.
    #[arg(long, global = true)]
    host: Option<HostKind>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick the image source from a menu.
    Menu {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Store a photo taken from the given source.
    Capture {
        #[command(flatten)]
        source: SourceArgs,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Delete {
        name: String,
    },
    Upload {
        name: String,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Photo file on this device.
    #[arg(long, conflicts_with = "url")]
    path: Option<PathBuf>,
    /// Photo reachable over HTTP.
    #[arg(long)]
    url: Option<Url>,
}

impl SourceArgs {
    fn reference(&self) -> Result<Option<PhotoReference>> {
        if let Some(path) = &self.path {
            let path = std::fs::canonicalize(path)
                .with_context(|| format!("photo '{}' is not readable", path.display()))?;
            return Ok(Some(PhotoReference::native(path)));
        }
        Ok(self.url.clone().map(PhotoReference::web))
    }
}

/// The photo the camera choice yields. `capture` needs a source; `menu`
/// without one can only cancel, which is logged.
fn capture_provider(command: &Command) -> Result<FixedCaptureProvider> {
    match command {
        Command::Capture { source } => source
            .reference()?
            .map(FixedCaptureProvider::new)
            .ok_or_else(|| anyhow!("capture needs --path or --url")),
        Command::Menu { source } => match source.reference()? {
            Some(reference) => Ok(FixedCaptureProvider::new(reference)),
            None => {
                tracing::warn!("no --path or --url given; choosing the camera will cancel");
                Ok(FixedCaptureProvider::cancelled())
            }
        },
        _ => Ok(FixedCaptureProvider::cancelled()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("desktop=info,client_core=info,storage=info,warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = Some(data_dir);
    }
    if let Some(upload_url) = cli.upload_url {
        settings.upload_url = upload_url;
    }
    if let Some(host) = cli.host {
        settings.host = host;
    }

    let capture = capture_provider(&cli.command)?;
    let presenter: Arc<dyn Presenter> = match &cli.command {
        Command::List { json: true } => Arc::new(SilentPresenter),
        _ => Arc::new(TerminalPresenter),
    };

    let mut controller = build_controller(&settings, capture, presenter)?;
    tracing::debug!(host = %controller.host_kind(), "photo session ready");

    match cli.command {
        Command::Menu { .. } => {
            let outcome = controller.select_image_source().await?;
            print_outcome(&outcome);
        }
        Command::Capture { .. } => {
            let outcome = controller.capture_and_persist().await?;
            print_outcome(&outcome);
        }
        Command::List { json } => {
            controller.refresh_list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(controller.images())?);
            } else {
                for record in controller.images() {
                    println!("{}\t{}", record.name, record.path);
                }
            }
        }
        Command::Delete { name } => {
            controller.refresh_list().await?;
            let record = controller
                .find(&name)
                .cloned()
                .ok_or_else(|| anyhow!("no stored photo named '{name}'"))?;
            controller.delete_record(&record).await?;
            println!("deleted {name}; {} photo(s) left", controller.images().len());
        }
        Command::Upload { name } => {
            controller.refresh_list().await?;
            let record = controller
                .find(&name)
                .ok_or_else(|| anyhow!("no stored photo named '{name}'"))?;
            let receipt = controller.transfer(record).await?;
            println!("uploaded {} (status {})", receipt.file_name, receipt.status);
        }
    }

    Ok(())
}

fn build_controller(
    settings: &Settings,
    capture: FixedCaptureProvider,
    presenter: Arc<dyn Presenter>,
) -> Result<PhotoSessionController> {
    let roots = settings.directory_roots()?;
    let store: Arc<dyn LocalStore> = Arc::new(FsLocalStore::new(roots));

    let mut http = reqwest::Client::builder();
    if let Some(seconds) = settings.http_timeout_seconds {
        http = http.timeout(Duration::from_secs(seconds));
    }
    let http = http.build().context("failed to build http client")?;

    let endpoint = Url::parse(&settings.upload_url)
        .with_context(|| format!("invalid upload url '{}'", settings.upload_url))?;

    Ok(PhotoSessionController::new(
        store.clone(),
        settings.host.build(store, http.clone()),
        Arc::new(capture),
        Arc::new(HttpTransferProvider::new(http, endpoint)),
        presenter,
    ))
}

fn print_outcome(outcome: &CaptureOutcome) {
    match outcome {
        CaptureOutcome::Cancelled => println!("cancelled"),
        CaptureOutcome::Persisted { name, path } => println!("stored {name} at {path}"),
    }
}
