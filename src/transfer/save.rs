//! Writing a received file to disk without clobbering anything.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::common::TransferResult;
use crate::config::FALLBACK_FILENAME;

/// Reduces a transfer-supplied filename to a single safe path component.
///
/// The name arrives in a response header, so directory parts are stripped
/// rather than trusted.
fn safe_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Picks a free path for `filename` inside `dir`, probing `name (1).ext`,
/// `name (2).ext`, ... while the plain name is taken.
pub async fn find_available_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = safe_filename(filename);

    let candidate = dir.join(&filename);
    if !candidate.exists() {
        return candidate;
    }

    // Split on the first dot so "archive.tar.gz" counts as "archive (1).tar.gz"
    let (stem, extensions) = match filename.find('.') {
        Some(dot) if dot > 0 => (filename[..dot].to_string(), filename[dot..].to_string()),
        _ => (filename.clone(), String::new()),
    };

    let mut counter: u32 = 1;
    loop {
        let candidate = dir.join(format!("{stem} ({counter}){extensions}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Writes the received payload into `dir` under its transfer name and
/// returns the path actually used.
pub async fn save_to_dir(result: &TransferResult, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = find_available_path(dir, &result.filename).await;

    // create_new: if something claimed the name since probing, error out
    // instead of overwriting it
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    file.write_all(&result.bytes)
        .await
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    tracing::info!(path = %path.display(), size = result.bytes.len(), "saved received file");
    Ok(path)
}
