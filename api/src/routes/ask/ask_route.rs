//! POST /ask: answers a question from the indexed document.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is covered under comprehensive insurance?"}'
/// ```
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(AskRequest { question }) = body?;
    info!(question_chars = question.len(), "ask: received");

    let qa = state.responder.answer(&question).await?;

    info!(
        context_units = qa.context.len(),
        answer_chars = qa.answer.len(),
        "ask: answered"
    );
    Ok(Json(AskResponse { answer: qa.answer }))
}
