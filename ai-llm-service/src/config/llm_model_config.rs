use crate::config::llm_provider::LlmProvider;

/// Configuration for one model invocation profile.
///
/// # Fields
///
/// - `provider`: which backend serves the model.
/// - `model`: model identifier (e.g. `"llama3"`, `"nomic-embed-text"`).
/// - `endpoint`: base URL of the inference server.
/// - `max_tokens`: maximum number of tokens to generate (`num_predict`).
/// - `temperature`: sampling temperature; `None` keeps the model default.
/// - `top_p`: nucleus sampling cutoff; `None` keeps the model default.
/// - `timeout_secs`: HTTP request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "llama3".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(600),
/// };
/// assert_eq!(cfg.model, "llama3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
