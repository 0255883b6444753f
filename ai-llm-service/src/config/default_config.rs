//! Default model configs resolved from environment variables.
//!
//! Two roles are used by the service:
//!
//! - **Generation** → the completion model that writes the answer
//! - **Embedding**  → the model that turns text into vectors
//!
//! Every knob has a default, so a bare environment talks to a local Ollama
//! with `llama3` and `nomic-embed-text`.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (only `ollama` is accepted)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//! - `LLM_TEMPERATURE` = optional sampling temperature (0.0..=2.0)
//! - `LLM_TIMEOUT_SECS` = HTTP timeout for generation (default: 600)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default: `http://localhost:11434`)
//! - `OLLAMA_MODEL`                = generation model (default: `llama3`)
//! - `EMBEDDING_MODEL`             = embedding model (default: `nomic-embed-text`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider, process_env},
    error_handler::{
        AiLlmError, ConfigError, parse_opt_f32, parse_opt_u32, parse_opt_u64,
        validate_http_endpoint, validate_range_f32,
    },
};

/// Default Ollama endpoint when neither `OLLAMA_URL` nor `OLLAMA_PORT` is set.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "llama3";
/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 600;
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Resolves the provider from `LLM_KIND` (defaults to Ollama).
fn provider(lookup: &dyn Fn(&str) -> Option<String>) -> Result<LlmProvider, AiLlmError> {
    match lookup("LLM_KIND") {
        None => Ok(LlmProvider::Ollama),
        Some(kind) => LlmProvider::parse(&kind)
            .ok_or_else(|| ConfigError::UnsupportedProvider(kind).into()),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. [`DEFAULT_OLLAMA_URL`]
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is not a port
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` has no http(s) scheme
fn ollama_endpoint(lookup: &dyn Fn(&str) -> Option<String>) -> Result<String, AiLlmError> {
    if let Some(url) = lookup("OLLAMA_URL") {
        let url = url.trim().trim_end_matches('/').to_string();
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = lookup("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

fn model_name(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
    default: &str,
) -> Result<String, AiLlmError> {
    let model = lookup(var).unwrap_or_else(|| default.to_string());
    let model = model.trim().to_string();
    if model.is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    Ok(model)
}

/// Config for the **generation** model, read from the process environment.
pub fn config_ollama_generation() -> Result<LlmModelConfig, AiLlmError> {
    generation_from_lookup(&process_env)
}

/// Config for the **embedding** model, read from the process environment.
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    embedding_from_lookup(&process_env)
}

/// Builds the generation config from an arbitrary key lookup.
///
/// # Defaults
/// - `temperature = None` (model default)
/// - `timeout_secs = Some(600)`
pub fn generation_from_lookup(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider(lookup)?;
    let endpoint = ollama_endpoint(lookup)?;
    let model = model_name(lookup, "OLLAMA_MODEL", DEFAULT_GENERATION_MODEL)?;
    let max_tokens = parse_opt_u32("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"))?;
    let temperature = parse_opt_f32("LLM_TEMPERATURE", lookup("LLM_TEMPERATURE"))?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 2.0)?;
    }
    let timeout_secs = parse_opt_u64("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"))?
        .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        max_tokens,
        temperature,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Builds the embedding config from an arbitrary key lookup.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
pub fn embedding_from_lookup(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider(lookup)?;
    let endpoint = ollama_endpoint(lookup)?;
    let model = model_name(lookup, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL)?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(DEFAULT_EMBEDDING_TIMEOUT_SECS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_local_ollama() {
        let lookup = lookup_from(&[]);
        let generation = generation_from_lookup(&lookup).unwrap();
        assert_eq!(generation.endpoint, DEFAULT_OLLAMA_URL);
        assert_eq!(generation.model, "llama3");
        assert_eq!(generation.timeout_secs, Some(600));
        assert_eq!(generation.temperature, None);

        let embedding = embedding_from_lookup(&lookup).unwrap();
        assert_eq!(embedding.model, "nomic-embed-text");
        assert_eq!(embedding.provider, LlmProvider::Ollama);
    }

    #[test]
    fn url_wins_over_port_and_is_normalized() {
        let lookup = lookup_from(&[
            ("OLLAMA_URL", "http://gpu-box:11434/"),
            ("OLLAMA_PORT", "9999"),
        ]);
        let cfg = generation_from_lookup(&lookup).unwrap();
        assert_eq!(cfg.endpoint, "http://gpu-box:11434");
    }

    #[test]
    fn port_builds_localhost_endpoint() {
        let lookup = lookup_from(&[("OLLAMA_PORT", "11500")]);
        let cfg = embedding_from_lookup(&lookup).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:11500");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_port = lookup_from(&[("OLLAMA_PORT", "70000")]);
        assert!(generation_from_lookup(&bad_port).is_err());

        let bad_scheme = lookup_from(&[("OLLAMA_URL", "gpu-box:11434")]);
        assert!(generation_from_lookup(&bad_scheme).is_err());

        let bad_temp = lookup_from(&[("LLM_TEMPERATURE", "3.5")]);
        assert!(generation_from_lookup(&bad_temp).is_err());

        let bad_kind = lookup_from(&[("LLM_KIND", "chatgpt")]);
        assert!(matches!(
            generation_from_lookup(&bad_kind),
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));
    }

    #[test]
    fn overrides_are_applied() {
        let lookup = lookup_from(&[
            ("OLLAMA_MODEL", "mistral"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_TEMPERATURE", "0.3"),
            ("LLM_TIMEOUT_SECS", "45"),
        ]);
        let cfg = generation_from_lookup(&lookup).unwrap();
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.max_tokens, Some(256));
        assert_eq!(cfg.temperature, Some(0.3));
        assert_eq!(cfg.timeout_secs, Some(45));
    }
}
