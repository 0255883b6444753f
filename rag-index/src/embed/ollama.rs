//! Ollama embedding provider backed by [`LlmServiceProfiles`].

use std::sync::Arc;

use ai_llm_service::AiLlmError;
use ai_llm_service::service_profiles::LlmServiceProfiles;
use ai_llm_service::services::ollama_service::OllamaError;
use tracing::debug;

use crate::embed::{EmbedFuture, EmbeddingsProvider};
use crate::errors::EmbeddingError;

#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    svc: Arc<LlmServiceProfiles>,
    /// Enforced on every response when set.
    dim: Option<usize>,
}

impl OllamaEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn model(&self) -> &str {
        self.svc.embedding_model()
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            let vector = self
                .svc
                .embed(text)
                .await
                .map_err(|e| provider_error(self.model(), e))?;

            if vector.iter().any(|x| !x.is_finite()) {
                return Err(EmbeddingError::Malformed(
                    "vector contains non-finite values".into(),
                ));
            }
            if let Some(want) = self.dim {
                if vector.len() != want {
                    return Err(EmbeddingError::DimensionMismatch {
                        got: vector.len(),
                        want,
                    });
                }
            }

            debug!(model = %self.model(), dim = vector.len(), chars = text.len(), "embedded text");
            Ok(vector)
        })
    }
}

/// Undecodable or empty responses are malformed output; everything else
/// (transport, HTTP status, timeouts) is a provider failure.
fn provider_error(model: &str, err: AiLlmError) -> EmbeddingError {
    match err {
        AiLlmError::Ollama(OllamaError::Decode(msg)) => EmbeddingError::Malformed(msg),
        other => EmbeddingError::Provider {
            model: model.to_string(),
            message: other.to_string(),
        },
    }
}
