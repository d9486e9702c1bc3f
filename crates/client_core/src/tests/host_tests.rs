use super::*;

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use storage::{DirectoryRoots, FsLocalStore};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

async fn spawn_photo_server() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/img.jpg",
            get(|| async { ([(CONTENT_TYPE, "image/png")], PNG_BYTES) }),
        )
        .route(
            "/broken.jpg",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn native_host_returns_store_payload_unchanged() {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(FsLocalStore::new(DirectoryRoots::under(dir.path())));
    let photo = dir.path().join("img.jpg");
    std::fs::write(&photo, b"\xff\xd8native").expect("seed");
    let expected = store
        .read(Directory::Root, photo.to_str().expect("utf8"))
        .await
        .expect("direct read");

    let host = NativeHost::new(store);
    let data = host
        .resolve_photo(&PhotoReference::native(&photo))
        .await
        .expect("resolve");

    assert_eq!(data.payload(), expected);
    assert_eq!(data.mime_type(), "image/jpeg");
    assert_eq!(data.to_string(), format!("data:image/jpeg;base64,{expected}"));
}

#[tokio::test]
async fn native_host_requires_a_device_path() {
    let dir = TempDir::new().expect("tempdir");
    let host = NativeHost::new(Arc::new(FsLocalStore::new(DirectoryRoots::under(dir.path()))));
    let reference = PhotoReference::web(Url::parse("https://x/img.jpg").expect("url"));

    let err = host.resolve_photo(&reference).await.expect_err("no path");
    assert!(matches!(err, PhotoError::InvalidReference(_)));
}

#[tokio::test]
async fn native_host_reports_missing_file_as_read_failure() {
    let dir = TempDir::new().expect("tempdir");
    let host = NativeHost::new(Arc::new(FsLocalStore::new(DirectoryRoots::under(dir.path()))));
    let reference = PhotoReference::native(dir.path().join("missing.jpg"));

    let err = host.resolve_photo(&reference).await.expect_err("missing");
    assert!(matches!(err, PhotoError::StorageReadFailed { .. }));
}

#[tokio::test]
async fn web_host_prefixes_payload_with_detected_mime() {
    let server_url = spawn_photo_server().await.expect("spawn server");
    let host = WebHost::new(Client::new());
    let reference = PhotoReference::web(Url::parse(&format!("{server_url}/img.jpg")).expect("url"));

    let data = host.resolve_photo(&reference).await.expect("resolve");

    assert_eq!(data.mime_type(), "image/png");
    assert_eq!(data.payload(), STANDARD.encode(PNG_BYTES));
    assert!(data.to_string().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn web_host_maps_http_errors_to_fetch_failure() {
    let server_url = spawn_photo_server().await.expect("spawn server");
    let host = WebHost::new(Client::new());
    let reference =
        PhotoReference::web(Url::parse(&format!("{server_url}/broken.jpg")).expect("url"));

    let err = host.resolve_photo(&reference).await.expect_err("404");
    assert!(matches!(err, PhotoError::CaptureFetchFailed { .. }));
}

#[test]
fn host_kind_parses_known_names() {
    assert_eq!("native".parse::<HostKind>(), Ok(HostKind::Native));
    assert_eq!("Hybrid".parse::<HostKind>(), Ok(HostKind::Native));
    assert_eq!(" web ".parse::<HostKind>(), Ok(HostKind::Web));
    assert!("desktop".parse::<HostKind>().is_err());
}

#[test]
fn host_kind_builds_matching_environment() {
    let dir = TempDir::new().expect("tempdir");
    let store: Arc<dyn LocalStore> =
        Arc::new(FsLocalStore::new(DirectoryRoots::under(dir.path())));
    for kind in [HostKind::Native, HostKind::Web] {
        let host = kind.build(store.clone(), Client::new());
        assert_eq!(host.kind(), kind);
    }
}
