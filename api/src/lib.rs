//! HTTP surface: a single `POST /ask` route over a shared [`contextor::Responder`].

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{Router, middleware, routing::post};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

pub use crate::core::app_state::AppState;
pub use crate::core::server_config::ServerConfig;
pub use crate::error_handler::AppError;

use crate::middleware_layer::request_id::request_span;
use crate::routes::ask::ask_route::ask;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Bind `cfg.address` and serve until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address cannot be bound, [`AppError::Server`]
/// if serving fails.
pub async fn start(state: AppState, cfg: ServerConfig) -> Result<(), AppError> {
    let listener = TcpListener::bind(cfg.address)
        .await
        .map_err(AppError::Bind)?;
    let local = listener.local_addr().map_err(AppError::Bind)?;
    info!(address = %local, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        // Without a signal handler the server can only be stopped externally.
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await
        }
    }
}
