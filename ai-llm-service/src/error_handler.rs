//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`HealthError`]). Small helpers for reading/validating configuration values are
//! provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::services::ollama_service::OllamaError;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Health-check/connectivity/decoding errors.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Errors raised by the Ollama client itself.
    #[error(transparent)]
    Ollama(#[from] OllamaError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// True when the failure was a client-side timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            AiLlmError::Timeout(_) => true,
            AiLlmError::HttpTransport(e) => e.is_timeout(),
            AiLlmError::Ollama(OllamaError::Transport(e)) => e.is_timeout(),
            _ => false,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Required value is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Health errors                                                             */
/* ------------------------------------------------------------------------- */

/// Status, URL and a short body excerpt of a failed upstream call.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// Error enum for provider health checks.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    /// The endpoint is empty or does not start with http/https.
    #[error("[AI LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Maximum number of characters kept from an upstream error body.
pub const SNIPPET_MAX_CHARS: usize = 240;

/// Trims an upstream body to a log-friendly one-liner.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(SNIPPET_MAX_CHARS).collect()
}

/// Parses an optional `u32` (`Ok(None)` if unset).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a valid `u32`.
pub fn parse_opt_u32(name: &'static str, value: Option<String>) -> Result<Option<u32>> {
    match value {
        Some(v) => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `u64` (`Ok(None)` if unset).
pub fn parse_opt_u64(name: &'static str, value: Option<String>) -> Result<Option<u64>> {
    match value {
        Some(v) => v.trim().parse::<u64>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `f32` (`Ok(None)` if unset).
pub fn parse_opt_f32(name: &'static str, value: Option<String>) -> Result<Option<f32>> {
    match value {
        Some(v) => v.trim().parse::<f32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected a decimal number",
            })
        }),
        None => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_flattened_and_clamped() {
        let body = format!("line one\n\n   line two {}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(s.starts_with("line one line two "));
        assert_eq!(s.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[test]
    fn optional_numbers() {
        assert_eq!(parse_opt_u32("N", None).unwrap(), None);
        assert_eq!(parse_opt_u32("N", Some(" 42 ".into())).unwrap(), Some(42));
        assert!(matches!(
            parse_opt_u32("N", Some("-1".into())),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "N", .. }))
        ));
        assert!(parse_opt_f32("T", Some("abc".into())).is_err());
    }

    #[test]
    fn endpoint_and_range_validation() {
        assert!(validate_http_endpoint("URL", "https://x").is_ok());
        assert!(validate_http_endpoint("URL", "localhost:11434").is_err());
        assert!(validate_range_f32("temperature", 0.7, 0.0, 2.0).is_ok());
        assert!(validate_range_f32("temperature", f32::NAN, 0.0, 2.0).is_err());
        assert!(validate_range_f32("temperature", 2.5, 0.0, 2.0).is_err());
    }
}
