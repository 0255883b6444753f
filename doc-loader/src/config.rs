//! Loader settings read from environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Default document path, relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "data/insurance_faq.txt";
const DEFAULT_MAX_CHARS: usize = 1000;

/// How the source text is turned into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkMode {
    /// Semantic splitting into chunks of at most `max_chars` characters.
    Split,
    /// The whole (trimmed) document is one unit.
    Single,
}

impl ChunkMode {
    /// Parse from env string (case-insensitive). `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "split" | "chunk" | "chunked" => Some(ChunkMode::Split),
            "single" | "whole" => Some(ChunkMode::Single),
            _ => None,
        }
    }
}

/// Runtime configuration for the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// File to load at startup.
    pub source_path: PathBuf,
    /// Chunking policy.
    pub mode: ChunkMode,
    /// Maximum characters per unit in [`ChunkMode::Split`].
    pub max_chars: usize,
    /// Characters shared between neighbouring units (must be `< max_chars`).
    pub overlap_chars: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            mode: ChunkMode::Split,
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: 0,
        }
    }
}

impl LoaderConfig {
    /// Build configuration from the process environment.
    ///
    /// Environment variables used:
    /// - `SOURCE_PATH` (default: `data/insurance_faq.txt`)
    /// - `CHUNK_MODE` (`split` | `single`; default: `split`)
    /// - `CHUNK_MAX_CHARS` (default: 1000)
    /// - `CHUNK_OVERLAP_CHARS` (default: 0)
    pub fn from_env() -> Result<Self, LoadError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Same as [`LoaderConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let source_path = lookup("SOURCE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.source_path);

        let mode = match lookup("CHUNK_MODE") {
            Some(v) => ChunkMode::parse(&v).ok_or(LoadError::EnvParse {
                key: "CHUNK_MODE".into(),
                value: v,
            })?,
            None => defaults.mode,
        };

        let max_chars = read_usize(&lookup, "CHUNK_MAX_CHARS")?.unwrap_or(defaults.max_chars);
        let overlap_chars =
            read_usize(&lookup, "CHUNK_OVERLAP_CHARS")?.unwrap_or(defaults.overlap_chars);

        let cfg = Self {
            source_path,
            mode,
            max_chars,
            overlap_chars,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the chunk size bounds.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.max_chars == 0 {
            return Err(LoadError::InvalidConfig(
                "CHUNK_MAX_CHARS must be > 0".into(),
            ));
        }
        if self.overlap_chars >= self.max_chars {
            return Err(LoadError::InvalidConfig(format!(
                "CHUNK_OVERLAP_CHARS ({}) must be smaller than CHUNK_MAX_CHARS ({})",
                self.overlap_chars, self.max_chars
            )));
        }
        Ok(())
    }
}

/// Read an optional `usize`, with parse errors mapped to `LoadError`.
fn read_usize<F>(lookup: &F, key: &str) -> Result<Option<usize>, LoadError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| LoadError::EnvParse {
                key: key.into(),
                value: v,
            }),
        None => Ok(None),
    }
}
