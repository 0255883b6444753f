use std::net::SocketAddr;

use crate::error_handler::AppError;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

impl ServerConfig {
    /// Reads `API_ADDRESS` (default `0.0.0.0:5000`).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());
        let address = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("API_ADDRESS {raw:?}: {e}")))?;
        Ok(Self { address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_5000_on_all_interfaces() {
        let cfg = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.address, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn rejects_unparsable_address() {
        let err = ServerConfig::from_lookup(|_| Some("localhost".into())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
