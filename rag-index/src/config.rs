//! Index settings read from environment variables.

use crate::errors::IndexError;

const DEFAULT_CONCURRENCY: usize = 4;

/// Runtime configuration for [`crate::VectorIndex::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Required vector length. `None` infers it from the first embedding.
    pub expected_dim: Option<usize>,
    /// Embedding requests kept in flight while building.
    pub concurrency: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            expected_dim: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl IndexConfig {
    /// Environment variables used:
    /// - `EMBEDDING_DIM` (optional, > 0)
    /// - `EMBEDDING_CONCURRENCY` (default: 4, > 0)
    pub fn from_env() -> Result<Self, IndexError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expected_dim = read_positive(&lookup, "EMBEDDING_DIM")?;
        let concurrency =
            read_positive(&lookup, "EMBEDDING_CONCURRENCY")?.unwrap_or(DEFAULT_CONCURRENCY);

        Ok(Self {
            expected_dim,
            concurrency,
        })
    }
}

fn read_positive<F>(lookup: &F, key: &str) -> Result<Option<usize>, IndexError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(IndexError::InvalidConfig(format!("{key} must be > 0"))),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(IndexError::EnvParse {
            key: key.into(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        assert_eq!(IndexConfig::from_lookup(|_| None).unwrap(), IndexConfig::default());

        let cfg = IndexConfig::from_lookup(|key| match key {
            "EMBEDDING_DIM" => Some("768".into()),
            "EMBEDDING_CONCURRENCY" => Some(" 8 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.expected_dim, Some(768));
        assert_eq!(cfg.concurrency, 8);
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        let zero = IndexConfig::from_lookup(|k| (k == "EMBEDDING_CONCURRENCY").then(|| "0".into()));
        assert!(matches!(zero, Err(IndexError::InvalidConfig(_))));

        let garbage = IndexConfig::from_lookup(|k| (k == "EMBEDDING_DIM").then(|| "wide".into()));
        assert!(matches!(garbage, Err(IndexError::EnvParse { .. })));
    }
}
