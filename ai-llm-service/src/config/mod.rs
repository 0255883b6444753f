pub mod default_config;
pub mod llm_model_config;
pub mod llm_provider;

/// Reads a variable from the process environment, treating blank values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
