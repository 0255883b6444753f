//! Health probes for the Ollama backend.
//!
//! `GET {endpoint}/api/tags` is used as a best-effort check that the server is
//! reachable and the configured model has been pulled.
//!
//! The returned [`HealthStatus`] is JSON-serializable. [`HealthService::check`]
//! is resilient and never fails (errors are mapped to `ok=false`); the strict
//! probe returns a `Result`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn new(
        cfg: &LlmModelConfig,
        ok: bool,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Minimal `/api/tags` shape: `{ "models": [ { "name": "<model>" }, ... ] }`.
#[derive(Deserialize)]
struct Tags {
    models: Option<Vec<Tag>>,
}

#[derive(Deserialize)]
struct Tag {
    name: String,
}

/// Ollama tags carry an explicit `:latest` suffix that configs usually omit.
fn tag_matches(tag: &str, model: &str) -> bool {
    tag == model || tag.strip_suffix(":latest") == Some(model)
}

/// A health checker that reuses a single HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        debug!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single config. Never returns an error.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.try_probe_ollama(cfg).await,
        };

        match result {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status =
                    HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Checks several configs in sequence.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Strict Ollama probe. Returns an error on hard failures.
    async fn try_probe_ollama(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let url = format!("{}/api/tags", endpoint.trim_end_matches('/'));
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        let start = Instant::now();
        debug!(endpoint = %cfg.endpoint, model = %cfg.model, "GET {}", url);

        let resp = self.client.get(&url).timeout(timeout).send().await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(%url, %status, %snippet, latency_ms = latency, "GET /api/tags returned non-success status");

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        let status = match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                if models.iter().any(|m| tag_matches(&m.name, &cfg.model)) {
                    HealthStatus::new(cfg, true, latency, "Ollama is healthy; model is available")
                } else {
                    HealthStatus::new(
                        cfg,
                        false,
                        latency,
                        "Ollama is up, but model not found in /api/tags",
                    )
                }
            }
            Ok(Tags { models: None }) => HealthStatus::new(
                cfg,
                true,
                latency,
                "Ollama is healthy; tags response without `models` field",
            ),
            Err(e) => {
                warn!(error = %e, "failed to decode /api/tags; treating server as reachable");
                HealthStatus::new(
                    cfg,
                    true,
                    latency,
                    format!("Ollama is reachable; failed to decode /api/tags: {e}"),
                )
            }
        };

        Ok(status)
    }
}
