//! Shared Ollama access for the question answering service.
//!
//! - [`config`]: typed model configs and env-driven defaults.
//! - [`services::ollama_service`]: thin HTTP client for `/api/generate` and `/api/embeddings`.
//! - [`service_profiles`]: the `generation` + `embedding` pair shared by the app.
//! - [`health_service`]: best-effort reachability probes.
//! - [`telemetry`]: formatting layer and env filter for the binary.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError};
pub use service_profiles::LlmServiceProfiles;
