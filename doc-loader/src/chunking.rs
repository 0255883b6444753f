//! Chunking of an in-memory document into [`DocumentUnit`]s.
//!
//! `Split` mode relies on the `text-splitter` crate: it picks the highest
//! semantic level (paragraphs, then sentences, then words) that fits the
//! character budget and reports the byte offset of every chunk, so units can be
//! traced back to the source text.

use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

use crate::config::ChunkMode;
use crate::errors::LoadError;
use crate::types::DocumentUnit;

/// Split `text` into ordered units.
///
/// - Empty or whitespace-only input yields no units.
/// - Units are trimmed and ordered by ascending `offset`.
/// - `overlap` is ignored in [`ChunkMode::Single`].
///
/// # Errors
/// [`LoadError::InvalidConfig`] when `max_chars == 0` or `overlap >= max_chars`
/// in [`ChunkMode::Split`].
pub fn split_text(
    source: &str,
    text: &str,
    mode: ChunkMode,
    max_chars: usize,
    overlap: usize,
) -> Result<Vec<DocumentUnit>, LoadError> {
    if text.trim().is_empty() {
        debug!(source, "split_text: empty document; nothing to do");
        return Ok(Vec::new());
    }

    let units = match mode {
        ChunkMode::Single => {
            let start = text.len() - text.trim_start().len();
            vec![DocumentUnit::new(source, start, text.trim())]
        }
        ChunkMode::Split => {
            if max_chars == 0 {
                return Err(LoadError::InvalidConfig("max_chars must be > 0".into()));
            }
            let config = ChunkConfig::new(max_chars)
                .with_overlap(overlap)
                .map_err(|e| LoadError::InvalidConfig(e.to_string()))?
                .with_trim(true);
            let splitter = TextSplitter::new(config);

            splitter
                .chunk_indices(text)
                .filter(|(_, chunk)| !chunk.is_empty())
                .map(|(offset, chunk)| DocumentUnit::new(source, offset, chunk))
                .collect()
        }
    };

    debug!(source, units = units.len(), ?mode, "split_text: done");
    Ok(units)
}
