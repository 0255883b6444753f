use std::io::ErrorKind;
use std::time::Instant;

use tracing::{info, warn};

use crate::chunking::split_text;
use crate::config::LoaderConfig;
use crate::errors::LoadError;
use crate::types::DocumentUnit;

/// Read `cfg.source_path` and split it into document units.
///
/// # Errors
/// - [`LoadError::NotFound`] if the file does not exist
/// - [`LoadError::Io`] for other read failures
/// - [`LoadError::NotUtf8`] if the content is not UTF-8
/// - [`LoadError::InvalidConfig`] for an unusable chunk budget
pub async fn load_document(cfg: &LoaderConfig) -> Result<Vec<DocumentUnit>, LoadError> {
    let path = cfg.source_path.as_path();
    info!(
        target: "doc_loader::load",
        path = %path.display(),
        mode = ?cfg.mode,
        max_chars = cfg.max_chars,
        overlap_chars = cfg.overlap_chars,
        "load_document: start"
    );
    let started = Instant::now();

    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    let source = path.display().to_string();
    let units = split_text(&source, &text, cfg.mode, cfg.max_chars, cfg.overlap_chars)?;

    if units.is_empty() {
        warn!(
            target: "doc_loader::load",
            path = %path.display(),
            "load_document: document has no text; the index will be empty"
        );
    }

    info!(
        target: "doc_loader::load",
        path = %path.display(),
        bytes = text.len(),
        units = units.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "load_document: finished"
    );

    Ok(units)
}
