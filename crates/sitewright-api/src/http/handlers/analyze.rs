//! Reference website analysis handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub summary: String,
}

/// POST /api/v1/analyze - Summarize a reference website.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalyzeResponse>>, AppError> {
    let timer = RequestTimer::start();
    let summary = state.studio.analyze(&body.url).await?;
    Ok(Json(
        timer
            .success(AnalyzeResponse {
                url: body.url,
                summary,
            })
            .with_link("self", "/api/v1/analyze"),
    ))
}
