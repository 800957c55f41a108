// src/core/export.rs

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::core::renderer::RenderedResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `emoletr-analysis-<unix millis>.txt`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("emoletr-analysis-{}.txt", now.timestamp_millis())
}

/// Writes the plain-text form of the rendered result into `dir` and returns the
/// path of the new file.
pub fn export_results(
    rendered: &RenderedResult,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)
        .map_err(|source| ExportError::Io { path: dir.to_path_buf(), source })?;
    let path = dir.join(export_file_name(now));
    let text = rendered.to_plain_text();
    std::fs::write(&path, &text)
        .map_err(|source| ExportError::Io { path: path.clone(), source })?;
    info!(path = %path.display(), bytes = text.len(), "Analysis results exported.");
    Ok(path)
}
