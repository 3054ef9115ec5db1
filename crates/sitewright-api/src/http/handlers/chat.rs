//! Architect conversation handler.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use sitewright_types::brief::{Brief, ConversationTurn, ExtractionResult};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for one architect turn. The client owns the history and the
/// brief and sends both back each turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    pub message: String,
    #[serde(default)]
    pub brief: Brief,
}

/// POST /api/v1/chat - Run one architect turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ExtractionResult>>, AppError> {
    let timer = RequestTimer::start();
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let result = state
        .studio
        .chat(&body.history, &body.message, &body.brief)
        .await;

    let complete = result.is_complete;
    let mut resp = timer.success(result).with_link("self", "/api/v1/chat");
    if complete {
        resp = resp.with_link("generate", "/api/v1/sites");
    }
    Ok(Json(resp))
}
