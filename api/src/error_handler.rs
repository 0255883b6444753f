use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid server configuration: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request-time failure of the question answering pipeline.
    #[error(transparent)]
    Responder(#[from] ContextorError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Responder(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Responder(e) => match e {
                ContextorError::Retrieval(_) => "RETRIEVAL_ERROR",
                ContextorError::Embedding(_) => "EMBEDDING_ERROR",
                ContextorError::Generation(_) => "GENERATION_ERROR",
                _ => "INTERNAL_ERROR",
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}
