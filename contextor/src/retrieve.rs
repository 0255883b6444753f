//! Retrieval-only step: embed a question and fetch its nearest units.

use rag_index::{EmbeddingsProvider, RetrievalError, SearchHit, VectorIndex};
use tracing::debug;

use crate::error::ContextorError;

/// Top-`k` units for `question`.
///
/// An empty index fails before the embedder is called. The empty question has
/// no embedding (Ollama answers it with an empty vector), so it gets the first
/// `k` units in document order instead.
pub async fn retrieve(
    index: &VectorIndex,
    embedder: &dyn EmbeddingsProvider,
    question: &str,
    k: usize,
) -> Result<Vec<SearchHit>, ContextorError> {
    if index.is_empty() {
        return Err(RetrievalError::EmptyIndex.into());
    }

    if question.is_empty() {
        let hits = index.leading(k)?;
        debug!(
            target: "contextor::retrieve",
            k,
            hits = hits.len(),
            "empty question; using leading units"
        );
        return Ok(hits);
    }

    let query = embedder.embed(question).await?;
    let hits = index.search(&query, k)?;

    debug!(
        target: "contextor::retrieve",
        k,
        hits = hits.len(),
        best = hits.first().map(|h| h.score).unwrap_or_default(),
        "retrieved context"
    );
    Ok(hits)
}
