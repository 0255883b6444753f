use thiserror::Error;

/// Failure to turn a piece of text into a vector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbeddingError {
    /// The embedding backend failed (transport, HTTP status, timeout).
    #[error("embedding provider '{model}' failed: {message}")]
    Provider { model: String, message: String },

    /// The backend answered with something that is not a usable vector.
    #[error("malformed embedding: {0}")]
    Malformed(String),

    /// Vector length differs from the index dimensionality.
    #[error("embedding dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },
}

/// Failure while querying the index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    /// Nothing was indexed; no context can be retrieved.
    #[error("the index is empty")]
    EmptyIndex,

    /// Query vector length differs from the stored vectors.
    #[error("query dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },
}

/// Failure while building the index or reading its settings.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid value for {key}: {value:?}")]
    EnvParse { key: String, value: String },
}
