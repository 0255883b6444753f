use std::{future::Future, pin::Pin};

use crate::errors::EmbeddingError;

/// Boxed future returned by [`EmbeddingsProvider::embed`].
pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, EmbeddingError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// The same provider (same model) must be used for document units and for
/// questions; [`EmbeddingsProvider::model`] lets callers check that.
pub trait EmbeddingsProvider: Send + Sync {
    /// Model identifier the vectors come from.
    fn model(&self) -> &str;

    /// Embed a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;
}

pub mod ollama;
