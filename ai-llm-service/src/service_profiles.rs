//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Both underlying HTTP clients are built eagerly, so configuration
//!   problems surface at startup rather than on the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_ollama_embedding, config_ollama_generation};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     config_ollama_generation()?,
//!     config_ollama_embedding()?,
//!     Some(10),
//! )?);
//!
//! let emb = svc.embed("collision coverage").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::ollama_service::OllamaService,
};

/// Shared service holding one client per logical profile.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    generation: Arc<OllamaService>,
    embedding: Arc<OllamaService>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// - `generation`: completion model used to write answers.
    /// - `embedding`: model used for document and query vectors.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        generation: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let generation = Arc::new(Self::client_for(generation)?);
        let embedding = Arc::new(Self::client_for(embedding)?);

        Ok(Self {
            generation,
            embedding,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates text with the **generation** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the request fails, times out or cannot be decoded.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generation
            .generate(prompt)
            .await
            .map_err(AiLlmError::from)
    }

    /// Computes an embedding with the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedding
            .embeddings(input)
            .await
            .map_err(AiLlmError::from)
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// If both profiles point at the same endpoint and model, it is checked once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let (generation, embedding) = self.profiles();
        let mut list = vec![generation.clone()];
        if embedding.endpoint != generation.endpoint || embedding.model != generation.model {
            list.push(embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.generation.config(), self.embedding.config())
    }

    /// Name of the model used for embeddings.
    pub fn embedding_model(&self) -> &str {
        &self.embedding.config().model
    }

    fn client_for(cfg: LlmModelConfig) -> Result<OllamaService, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => OllamaService::new(cfg).map_err(AiLlmError::from),
        }
    }
}
