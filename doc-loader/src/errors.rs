//! Unified error type for the doc-loader crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring the loader or reading the source file.
#[derive(Debug, Error)]
pub enum LoadError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid loader configuration: {0}")]
    InvalidConfig(String),

    // ── I/O & filesystem ────────────────────────────────────────────────────
    /// The source file does not exist.
    #[error("source document not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Any other read failure (permissions, directory instead of file, ...).
    #[error("failed to read source document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 text.
    #[error("source document is not valid UTF-8: {}", path.display())]
    NotUtf8 { path: PathBuf },
}
