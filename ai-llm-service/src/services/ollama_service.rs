//! Lightweight Ollama service for text generation and embeddings.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate`: synchronous text generation (`stream=false`)
//! - `POST {endpoint}/api/embeddings`: embeddings retrieval
//!
//! It uses the universal configuration [`LlmModelConfig`] and ensures
//! that the selected provider is [`LlmProvider::Ollama`].
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "llama3".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     max_tokens: Some(256),
//!     temperature: None,
//!     top_p: None,
//!     timeout_secs: Some(30),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let text = svc.generate("What does comprehensive cover?").await?;
//! println!("Generated:\n{}", text);
//! # Ok(()) }
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::make_snippet;

/// Errors produced by [`OllamaService`].
#[derive(Debug, Error)]
pub enum OllamaError {
    /// The provider in the config is not Ollama.
    #[error("[AI LLM Service] invalid provider: expected Ollama, got {0:?}")]
    InvalidProvider(LlmProvider),

    /// Invalid endpoint (empty or missing http/https).
    #[error("[AI LLM Service] invalid Ollama endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("[AI LLM Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("[AI LLM Service] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("[AI LLM Service] failed to decode response: {0}")]
    Decode(String),
}

/// Result alias for Ollama operations.
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses one HTTP client with
/// the configured timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`OllamaError::InvalidProvider`] if `cfg.provider` is not `Ollama`
    /// - [`OllamaError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`OllamaError::Transport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(OllamaError::InvalidProvider(cfg.provider));
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(OllamaError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/api/generate", base);
        let url_embeddings = format!("{}/api/embeddings", base);

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embeddings,
        })
    }

    /// The config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// Mapped options:
    /// - `model`        ← `self.cfg.model`
    /// - `prompt`       ← argument
    /// - `num_predict`  ← `self.cfg.max_tokens`
    /// - `temperature`  ← `self.cfg.temperature`
    /// - `top_p`        ← `self.cfg.top_p`
    ///
    /// # Errors
    /// - [`OllamaError::HttpStatus`] for non-2xx responses
    /// - [`OllamaError::Transport`] for client errors (including timeouts)
    /// - [`OllamaError::Decode`] if response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_chars = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &self.url_generate).await);
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            OllamaError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        debug!(answer_chars = out.response.len(), "generation finished");
        Ok(out.response)
    }

    /// Retrieves one embedding vector via `/api/embeddings`.
    ///
    /// # Errors
    /// - [`OllamaError::HttpStatus`] for non-2xx responses
    /// - [`OllamaError::Transport`] for client errors
    /// - [`OllamaError::Decode`] if response cannot be parsed or the vector is empty
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(resp, &self.url_embeddings).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            OllamaError::Decode(format!(
                "serde error: {e}; expected `{{ embedding: number[] }}`"
            ))
        })?;

        if out.embedding.is_empty() {
            return Err(OllamaError::Decode(format!(
                "empty embedding returned by model {}",
                self.cfg.model
            )));
        }

        Ok(out.embedding)
    }
}

async fn status_error(resp: reqwest::Response, url: &str) -> OllamaError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    OllamaError::HttpStatus {
        status,
        url: url.to_string(),
        snippet: make_snippet(&text),
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: (!options.is_empty()).then_some(options),
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl GenerateOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.top_p.is_none() && self.num_predict.is_none()
    }
}

/// Response body for `/api/generate`; the generated text is in `response`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
