//! Text generation seam and its Ollama-backed implementation.

use std::time::Duration;
use std::{future::Future, pin::Pin};

use ai_llm_service::service_profiles::LlmServiceProfiles;

use crate::error::GenerationError;

pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

/// A language model that turns one prompt into one completion.
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a>;
}

impl TextGenerator for LlmServiceProfiles {
    fn model(&self) -> &str {
        &self.profiles().0.model
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            LlmServiceProfiles::generate(self, prompt)
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        let secs = self.profiles().0.timeout_secs.unwrap_or_default();
                        GenerationError::Timeout(Duration::from_secs(secs))
                    } else {
                        GenerationError::Provider {
                            model: TextGenerator::model(self).to_string(),
                            message: e.to_string(),
                        }
                    }
                })
        })
    }
}
