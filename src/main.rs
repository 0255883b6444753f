use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ai_llm_service::config::default_config::{config_ollama_embedding, config_ollama_generation};
use ai_llm_service::{LlmServiceProfiles, telemetry};
use api::{AppState, ServerConfig};
use contextor::{Responder, ResponderConfig};
use doc_loader::{LoaderConfig, load_document};
use rag_index::{IndexConfig, IndicatifProgress, OllamaEmbedder, VectorIndex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment and defaults still apply.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(telemetry::layer())
        .try_init()
        .context("installing tracing subscriber")?;

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env could not be loaded");
        }
    }

    // Configuration (fatal on invalid values).
    let loader_cfg = LoaderConfig::from_env().context("loader configuration")?;
    let index_cfg = IndexConfig::from_env().context("index configuration")?;
    let responder_cfg = ResponderConfig::from_env().context("responder configuration")?;
    let server_cfg = ServerConfig::from_env().context("server configuration")?;

    let generation = config_ollama_generation().context("generation model configuration")?;
    let embedding = config_ollama_embedding().context("embedding model configuration")?;
    let llm = Arc::new(
        LlmServiceProfiles::new(generation, embedding, Some(5)).context("creating Ollama clients")?,
    );

    for status in llm.health_all().await {
        if !status.ok {
            warn!(
                endpoint = %status.endpoint,
                model = status.model.as_deref().unwrap_or("n/a"),
                message = %status.message,
                "Ollama is not ready; indexing will likely fail"
            );
        }
    }

    // Indexing: runs once, before the port is bound.
    let units = load_document(&loader_cfg)
        .await
        .with_context(|| format!("loading {}", loader_cfg.source_path.display()))?;

    let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&llm), index_cfg.expected_dim));
    let progress = IndicatifProgress::bar(units.len() as u64);
    let (index, stats) = VectorIndex::build(units, embedder.as_ref(), &index_cfg, &progress)
        .await
        .context("building the vector index")?;
    info!(
        indexed = stats.indexed,
        dimension = stats.dimension,
        duration_ms = stats.duration_ms,
        "index ready"
    );

    let responder = Responder::new(Arc::new(index), embedder, llm, responder_cfg)
        .context("creating the responder")?;

    api::start(AppState::new(responder), server_cfg)
        .await
        .context("serving HTTP")?;

    Ok(())
}
