//! In-memory model of the file on each side of a transfer.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

use super::errors::TransferError;

/// A local file staged for registration with the relay.
///
/// Owned by the caller until handed to [`crate::relay::RelayClient::register`];
/// the client does not retain it after the request completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    name: String,
    content: Bytes,
}

impl FileDescriptor {
    /// Wraps in-memory bytes under a file name.
    ///
    /// Rejects empty or whitespace-only names: the relay keys the upload
    /// form part by filename and an unnamed part is unrecoverable later.
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Result<Self, TransferError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TransferError::UnnamedFile);
        }
        Ok(Self {
            name,
            content: content.into(),
        })
    }

    /// Reads a file from disk, naming it after its final path component.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .with_context(|| format!("No usable file name in path: {}", path.display()))?;

        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::new(name, content).context("File name rejected")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// What a successful redeem hands back: the original name and the payload.
///
/// Ownership passes to the caller; saving it anywhere is the caller's move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub filename: String,
    pub bytes: Bytes,
}
