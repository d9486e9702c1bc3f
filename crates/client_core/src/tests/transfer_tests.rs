use super::*;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use shared::{
    domain::{PhotoName, PhotoRecord},
    protocol::DataUrl,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedField {
    name: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct UploadServerState {
    received: Arc<Mutex<Vec<ReceivedField>>>,
}

async fn handle_upload(
    State(state): State<UploadServerState>,
    mut multipart: Multipart,
) -> (StatusCode, &'static str) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let Ok(bytes) = field.bytes().await else {
            return (StatusCode::BAD_REQUEST, "unreadable field");
        };
        state.received.lock().await.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    (StatusCode::OK, "stored")
}

async fn spawn_upload_server() -> Result<(Url, UploadServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = UploadServerState::default();
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route(
            "/full",
            post(|| async { (StatusCode::INSUFFICIENT_STORAGE, "disk full") }),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/upload"))?, state))
}

fn sample_record() -> PhotoRecord {
    PhotoRecord::new(
        PhotoName::parse("1700000000000.jpeg").expect("name"),
        DataUrl::from_bytes("image/jpeg", b"\xff\xd8\xff\xe0photo-body"),
    )
}

#[tokio::test]
async fn posts_record_as_single_file_field() {
    let (endpoint, state) = spawn_upload_server().await.expect("spawn server");
    let provider = HttpTransferProvider::new(Client::new(), endpoint);
    let record = sample_record();

    let upload = MultipartUpload::from_record(&record).expect("upload");
    let receipt = provider.submit(upload).await.expect("submit");

    assert_eq!(receipt.status, 200);
    assert_eq!(receipt.body, "stored");
    assert_eq!(receipt.file_name, "1700000000000.jpeg");

    let received = state.received.lock().await.clone();
    assert_eq!(
        received,
        vec![ReceivedField {
            name: Some("file".to_string()),
            file_name: Some("1700000000000.jpeg".to_string()),
            content_type: Some("image/jpeg".to_string()),
            bytes: record.data.decode().expect("decode"),
        }]
    );
}

#[tokio::test]
async fn non_success_status_is_a_transfer_error() {
    let (endpoint, _state) = spawn_upload_server().await.expect("spawn server");
    let provider = HttpTransferProvider::new(Client::new(), endpoint.join("/full").expect("url"));

    let upload = MultipartUpload::from_record(&sample_record()).expect("upload");
    let err = provider.submit(upload).await.expect_err("rejected");

    match err {
        TransferError::Status { status, body } => {
            assert_eq!(status, 507);
            assert_eq!(body, "disk full");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let provider = HttpTransferProvider::new(
        Client::new(),
        Url::parse(&format!("http://{addr}/upload")).expect("url"),
    );
    let upload = MultipartUpload::from_record(&sample_record()).expect("upload");

    let err = provider.submit(upload).await.expect_err("no server");
    assert!(matches!(err, TransferError::Network(_)));
}

#[tokio::test]
async fn rejects_unparseable_mime_type() {
    let provider = HttpTransferProvider::new(
        Client::new(),
        Url::parse("http://127.0.0.1:9/upload").expect("url"),
    );
    let mut upload = MultipartUpload::from_record(&sample_record()).expect("upload");
    upload.mime_type = "not a mime".to_string();

    let err = provider.submit(upload).await.expect_err("bad mime");
    assert!(matches!(err, TransferError::InvalidMime(_)));
}
