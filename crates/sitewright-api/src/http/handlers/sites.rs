//! Site generation, edit and artifact handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use sitewright_core::service::studio::StudioError;
use sitewright_infra::export::site_archive;
use sitewright_infra::preview::render_preview;
use sitewright_types::brief::Brief;
use sitewright_types::site::{GenerationArtifact, SessionId};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub brief: Brief,
    #[serde(default)]
    pub style: Option<String>,
    /// Existing session to overwrite. A fresh one is generated when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub source_text: String,
}

fn parse_session(raw: &str) -> Result<SessionId, AppError> {
    SessionId::parse(raw).map_err(|_| StudioError::InvalidSession(raw.to_string()).into())
}

fn artifact_response(
    timer: RequestTimer,
    artifact: GenerationArtifact,
) -> Json<ApiResponse<GenerationArtifact>> {
    let base = format!("/api/v1/sites/{}", artifact.session_id);
    let preview = format!("{base}/preview");
    let edit = format!("{base}/edit");
    let download = format!("{base}/download");
    Json(
        timer
            .success(artifact)
            .with_link("self", &base)
            .with_link("preview", &preview)
            .with_link("edit", &edit)
            .with_link("download", &download),
    )
}

/// POST /api/v1/sites - Generate a site from a brief.
pub async fn generate_site(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerationArtifact>>, AppError> {
    let timer = RequestTimer::start();
    let session_id = match body.session_id.as_deref() {
        Some(raw) => parse_session(raw)?,
        None => SessionId::generate(),
    };

    let artifact = state
        .studio
        .generate(&body.brief, body.style.as_deref(), &session_id)
        .await?;
    Ok(artifact_response(timer, artifact))
}

/// POST /api/v1/sites/{id}/edit - Apply a natural-language edit.
pub async fn edit_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EditRequest>,
) -> Result<Json<ApiResponse<GenerationArtifact>>, AppError> {
    let timer = RequestTimer::start();
    let session_id = parse_session(&id)?;
    if body.instruction.trim().is_empty() {
        return Err(AppError::Validation("instruction must not be empty".to_string()));
    }

    let artifact = state.studio.edit(&body.instruction, &session_id).await?;
    Ok(artifact_response(timer, artifact))
}

/// PUT /api/v1/sites/{id} - Overwrite the artifact with an earlier version.
pub async fn restore_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RestoreRequest>,
) -> Result<Json<ApiResponse<GenerationArtifact>>, AppError> {
    let timer = RequestTimer::start();
    let session_id = parse_session(&id)?;
    let artifact = state.studio.restore(&session_id, &body.source_text).await?;
    Ok(artifact_response(timer, artifact))
}

/// GET /api/v1/sites/{id} - Current source text.
pub async fn get_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GenerationArtifact>>, AppError> {
    let timer = RequestTimer::start();
    let session_id = parse_session(&id)?;
    let source_text = state.studio.source(&session_id).await?;
    Ok(artifact_response(
        timer,
        GenerationArtifact {
            session_id,
            source_text,
        },
    ))
}

/// GET /api/v1/sites/{id}/preview - Standalone HTML preview page.
pub async fn preview_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let session_id = parse_session(&id)?;
    let source_text = state.studio.source(&session_id).await?;
    Ok(Html(render_preview(&source_text)))
}

/// GET /api/v1/sites/{id}/download - Zip of source, preview and package manifest.
pub async fn download_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let session_id = parse_session(&id)?;
    let source_text = state.studio.source(&session_id).await?;
    let bytes = site_archive(&source_text).map_err(StudioError::Storage)?;
    tracing::info!(session_id = %session_id, bytes = bytes.len(), "site archive built");
    Ok(archive_response(&session_id, bytes))
}

fn archive_response(session_id: &SessionId, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"sitewright-{session_id}.zip\"");
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_rejects_traversal() {
        let err = parse_session("../../etc").unwrap_err();
        assert!(matches!(
            err,
            AppError::Studio(StudioError::InvalidSession(ref id)) if id == "../../etc"
        ));
        assert!(parse_session("abc-123").is_ok());
    }

    #[test]
    fn test_archive_response_names_the_session() {
        let id = SessionId::parse("bean-there").unwrap();
        let response = archive_response(&id, vec![0x50, 0x4b]);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"sitewright-bean-there.zip\""
        );
    }

    #[test]
    fn test_artifact_links_include_download() {
        let artifact = GenerationArtifact {
            session_id: SessionId::parse("s1").unwrap(),
            source_text: String::new(),
        };
        let Json(body) = artifact_response(RequestTimer::start(), artifact);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["_links"]["download"], "/api/v1/sites/s1/download");
    }

    #[test]
    fn test_generate_request_optional_fields() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"brief": {"name": "Bean There"}}"#).unwrap();
        assert_eq!(req.brief.name.as_deref(), Some("Bean There"));
        assert!(req.style.is_none());
        assert!(req.session_id.is_none());
    }
}
