//! HTTP client for the relay's session endpoints.

pub mod protocol;

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, StatusCode};

use crate::common::{FileDescriptor, RelaySettings, TransferError, TransferResult};
use crate::config::FALLBACK_FILENAME;
use crate::invite::InviteCode;

use protocol::{attachment_filename, RegisterResponse};

/// Stateless client for the two relay operations.
///
/// Never retries and never recovers locally; every failure is classified
/// and handed back to the caller.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Builds a client with a whole-request timeout, so no operation can
    /// stay in flight forever.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransferError> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransferError::Network)?;

        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &RelaySettings) -> Result<Self, TransferError> {
        Self::new(settings.url.clone(), settings.timeout())
    }

    /// Registers a file with the relay and returns the invite code for it.
    ///
    /// One multipart POST; the file is not retained here afterwards. Size
    /// limits are the relay's to enforce and come back as a rejection.
    pub async fn register(&self, file: &FileDescriptor) -> Result<InviteCode, TransferError> {
        let url = format!("{}/api/upload", self.base_url);
        tracing::debug!(
            file = file.name(),
            size = file.size_bytes(),
            "registering file with relay"
        );

        let part =
            Part::stream(Body::from(file.content().clone())).file_name(file.name().to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(TransferError::Network)?;

        let response = check_status(response).await?;

        let body: RegisterResponse = response.json().await.map_err(|e| {
            TransferError::Protocol(format!("upload response missing session number: {e}"))
        })?;

        let code = InviteCode::new(body.port).map_err(|_| {
            TransferError::Protocol(format!("relay returned unusable session number: {}", body.port))
        })?;

        tracing::info!(code = %code, "relay accepted file");
        Ok(code)
    }

    /// Exchanges an invite code for the file's bytes and original name.
    ///
    /// The code must have come through [`InviteCode`] parsing already, so
    /// anything the relay refuses here is a session problem, not a typo.
    pub async fn redeem(&self, code: InviteCode) -> Result<TransferResult, TransferError> {
        let url = format!("{}/api/download/{}", self.base_url, code);
        tracing::debug!(%code, "redeeming invite code");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(TransferError::Network)?;

        // The relay answers 404-class when the session expired or was
        // already consumed; keep that apart from other rejections.
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            tracing::debug!(%code, "relay has no live session for this code");
            return Err(TransferError::SessionNotFound);
        }

        let response = check_status(response).await?;

        let filename = filename_from_headers(response.headers());
        let bytes = response.bytes().await.map_err(TransferError::Network)?;

        tracing::info!(%code, filename = %filename, size = bytes.len(), "received file from relay");
        Ok(TransferResult { filename, bytes })
    }
}

/// Reads the body of a non-success response into a classified rejection.
async fn check_status(response: Response) -> Result<Response, TransferError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(TransferError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Scans response headers for `Content-Disposition` regardless of casing
/// and extracts the quoted filename, falling back to a fixed name.
fn filename_from_headers(headers: &HeaderMap) -> String {
    let disposition = headers
        .iter()
        .find(|(name, _)| name.as_str().eq_ignore_ascii_case("content-disposition"))
        .and_then(|(_, value)| value.to_str().ok());

    match disposition.and_then(attachment_filename) {
        Some(name) => name,
        None => {
            tracing::debug!("no usable filename in response, using fallback");
            FALLBACK_FILENAME.to_string()
        }
    }
}
