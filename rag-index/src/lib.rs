//! Public API:
//! - [`VectorIndex::build`]: embed every document unit and insert it into an HNSW graph.
//! - [`VectorIndex::search`]: top-k nearest units for a query vector.
//! - [`EmbeddingsProvider`]: the embedding seam, implemented by [`OllamaEmbedder`].

pub mod config;
pub mod embed;
pub mod errors;
mod index;
mod metric;
pub mod progress;

pub use config::IndexConfig;
pub use embed::{EmbedFuture, EmbeddingsProvider, ollama::OllamaEmbedder};
pub use errors::{EmbeddingError, IndexError, RetrievalError};
pub use index::{IndexStats, SearchHit, VectorIndex};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
