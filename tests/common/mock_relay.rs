//! Shared mock relay for integration tests.
//!
//! Two flavors: a scripted axum app bound to an ephemeral port (the normal
//! case), and a raw TCP responder that writes literal HTTP bytes for tests
//! that need control over header casing on the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Scripted behavior for `POST /api/upload`.
#[derive(Clone)]
pub enum UploadScript {
    Accept { port: u16 },
    AcceptSlowly { port: u16, delay_ms: u64 },
    Reject { status: u16, body: &'static str },
    MissingField,
}

/// Scripted behavior for `GET /api/download/{port}`.
#[derive(Clone)]
pub enum DownloadScript {
    Serve {
        disposition: Option<&'static str>,
        body: &'static [u8],
    },
    ServeSlowly {
        body: &'static [u8],
        delay_ms: u64,
    },
    NotFound,
    Reject { status: u16, body: &'static str },
}

/// What the upload endpoint saw inside the multipart body.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub size: usize,
}

#[derive(Clone)]
struct RelayState {
    upload: UploadScript,
    download: DownloadScript,
    upload_calls: Arc<AtomicUsize>,
    download_calls: Arc<AtomicUsize>,
    last_upload: Arc<Mutex<Option<UploadedFile>>>,
    last_download_code: Arc<Mutex<Option<String>>>,
}

/// Handle to a running scripted relay.
pub struct MockRelay {
    pub base_url: String,
    upload_calls: Arc<AtomicUsize>,
    download_calls: Arc<AtomicUsize>,
    last_upload: Arc<Mutex<Option<UploadedFile>>>,
    last_download_code: Arc<Mutex<Option<String>>>,
}

impl MockRelay {
    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<UploadedFile> {
        self.last_upload.lock().expect("mock relay lock").clone()
    }

    pub fn last_download_code(&self) -> Option<String> {
        self.last_download_code
            .lock()
            .expect("mock relay lock")
            .clone()
    }
}

async fn upload_handler(
    State(state): State<RelayState>,
    mut multipart: Multipart,
) -> axum::response::Response {
    state.upload_calls.fetch_add(1, Ordering::SeqCst);

    let mut seen = None;
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.expect("read file part");
            seen = Some(UploadedFile {
                filename,
                size: bytes.len(),
            });
        }
    }
    *state.last_upload.lock().expect("mock relay lock") = seen;

    match state.upload {
        UploadScript::Accept { port } => Json(json!({ "port": port })).into_response(),
        UploadScript::AcceptSlowly { port, delay_ms } => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Json(json!({ "port": port })).into_response()
        }
        UploadScript::Reject { status, body } => {
            let status = StatusCode::from_u16(status).expect("scripted status");
            (status, body).into_response()
        }
        UploadScript::MissingField => Json(json!({ "status": "ok" })).into_response(),
    }
}

async fn download_handler(
    Path(code): Path<String>,
    State(state): State<RelayState>,
) -> axum::response::Response {
    state.download_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_download_code.lock().expect("mock relay lock") = Some(code);

    match state.download {
        DownloadScript::Serve { disposition, body } => {
            let mut response = Response::builder().status(StatusCode::OK);
            if let Some(value) = disposition {
                response = response.header(header::CONTENT_DISPOSITION, value);
            }
            response
                .body(Body::from(body.to_vec()))
                .expect("scripted response")
        }
        DownloadScript::ServeSlowly { body, delay_ms } => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Response::new(Body::from(body.to_vec()))
        }
        DownloadScript::NotFound => (StatusCode::NOT_FOUND, "no session on this port").into_response(),
        DownloadScript::Reject { status, body } => {
            let status = StatusCode::from_u16(status).expect("scripted status");
            (status, body).into_response()
        }
    }
}

/// Binds the scripted relay on an ephemeral loopback port.
pub async fn spawn_relay(upload: UploadScript, download: DownloadScript) -> MockRelay {
    let state = RelayState {
        upload,
        download,
        upload_calls: Arc::new(AtomicUsize::new(0)),
        download_calls: Arc::new(AtomicUsize::new(0)),
        last_upload: Arc::new(Mutex::new(None)),
        last_download_code: Arc::new(Mutex::new(None)),
    };

    let relay = MockRelay {
        base_url: String::new(),
        upload_calls: state.upload_calls.clone(),
        download_calls: state.download_calls.clone(),
        last_upload: state.last_upload.clone(),
        last_download_code: state.last_download_code.clone(),
    };

    let app = Router::new()
        .route("/api/upload", post(upload_handler))
        .route("/api/download/:code", get(download_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock relay");
    let addr = listener.local_addr().expect("mock relay addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock relay serve");
    });

    MockRelay {
        base_url: format!("http://{addr}"),
        ..relay
    }
}

/// Serves every connection with one literal HTTP/1.1 response.
///
/// Frameworks normalize header names to lowercase, so tests that care about
/// casing on the wire go through this instead of axum.
pub async fn spawn_raw_relay(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind raw relay");
    let addr = listener.local_addr().expect("raw relay addr");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                // Drain the request head before answering
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
