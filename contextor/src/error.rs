//! Typed errors for the contextor crate.

use std::time::Duration;

use rag_index::{EmbeddingError, RetrievalError};
use thiserror::Error;

/// Failure of the language-model call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("generation with '{model}' failed: {message}")]
    Provider { model: String, message: String },

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum ContextorError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("question embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Query embedder and index were built from different models.
    #[error("embedding model mismatch: index built with '{index}', query embedder uses '{query}'")]
    ModelMismatch { index: String, query: String },

    #[error("invalid responder configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid value for {key}: {value:?}")]
    EnvParse { key: String, value: String },
}
