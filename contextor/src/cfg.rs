//! Runtime configuration loaded from environment variables.

use std::time::Duration;

use crate::error::ContextorError;

const DEFAULT_TOP_K: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponderConfig {
    /// Units retrieved per question.
    pub top_k: usize,
    /// Upper bound for one generation call; `None` relies on the HTTP client timeout.
    pub generation_timeout: Option<Duration>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            generation_timeout: None,
        }
    }
}

impl ResponderConfig {
    /// Environment variables used:
    /// - `RAG_TOP_K` (default: 4, > 0)
    /// - `GENERATION_TIMEOUT_SECS` (optional, > 0)
    pub fn from_env() -> Result<Self, ContextorError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContextorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_k = parse_positive(&lookup, "RAG_TOP_K")?.unwrap_or(DEFAULT_TOP_K as u64) as usize;
        let generation_timeout =
            parse_positive(&lookup, "GENERATION_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            top_k,
            generation_timeout,
        })
    }
}

fn parse_positive<F>(lookup: &F, key: &str) -> Result<Option<u64>, ContextorError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ContextorError::InvalidConfig(format!("{key} must be > 0"))),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ContextorError::EnvParse {
            key: key.into(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = ResponderConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.top_k, 4);
        assert_eq!(cfg.generation_timeout, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ResponderConfig::from_lookup(|key| match key {
            "RAG_TOP_K" => Some("6".into()),
            "GENERATION_TIMEOUT_SECS" => Some("90".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.top_k, 6);
        assert_eq!(cfg.generation_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(
            ResponderConfig::from_lookup(|k| (k == "RAG_TOP_K").then(|| "0".into())),
            Err(ContextorError::InvalidConfig(_))
        ));
        assert!(matches!(
            ResponderConfig::from_lookup(|k| (k == "GENERATION_TIMEOUT_SECS").then(|| "soon".into())),
            Err(ContextorError::EnvParse { .. })
        ));
    }
}
