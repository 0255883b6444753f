/// Represents the provider (backend) used for language model inference.
///
/// Only a local Ollama runtime is wired today. Adding another backend means
/// extending this enum and routing it in
/// [`LlmServiceProfiles`](crate::service_profiles::LlmServiceProfiles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime (`/api/generate`, `/api/embeddings`, `/api/tags`).
    Ollama,
}

impl LlmProvider {
    /// Parses a provider name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(LlmProvider::Ollama),
            _ => None,
        }
    }
}
