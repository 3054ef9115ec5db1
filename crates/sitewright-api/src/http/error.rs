//! Application error type mapping to HTTP status codes and envelope format.

use axum::response::{IntoResponse, Response};

use sitewright_core::service::studio::StudioError;
use sitewright_types::error::ResearchError;
use sitewright_types::llm::LlmError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Studio(StudioError),
    Research(ResearchError),
    Validation(String),
    Internal(String),
}

impl From<StudioError> for AppError {
    fn from(e: StudioError) -> Self {
        AppError::Studio(e)
    }
}

impl From<ResearchError> for AppError {
    fn from(e: ResearchError) -> Self {
        AppError::Research(e)
    }
}

impl AppError {
    /// Envelope error code and message.
    pub fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AppError::Studio(StudioError::SessionNotFound(id)) => {
                ("SESSION_NOT_FOUND", format!("Session '{id}' not found"))
            }
            AppError::Studio(StudioError::InvalidSession(id)) => {
                ("VALIDATION_ERROR", format!("Invalid session id '{id}'"))
            }
            AppError::Studio(e @ StudioError::CodeNotFound(_)) => ("CODE_NOT_FOUND", e.to_string()),
            AppError::Studio(e @ StudioError::Upstream(LlmError::RateLimited { .. })) => {
                ("RATE_LIMITED", e.to_string())
            }
            AppError::Studio(e @ StudioError::Upstream(_)) => {
                ("UPSTREAM_UNAVAILABLE", e.to_string())
            }
            AppError::Studio(StudioError::Storage(e)) => ("INTERNAL_ERROR", e.to_string()),
            AppError::Research(ResearchError::InvalidUrl(url)) => {
                ("VALIDATION_ERROR", format!("Invalid url '{url}'"))
            }
            AppError::Research(e @ ResearchError::Fetch { .. }) => {
                ("UPSTREAM_UNAVAILABLE", e.to_string())
            }
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => ("INTERNAL_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        if code == "INTERNAL_ERROR" {
            tracing::error!(error = %message, "request failed");
        } else {
            tracing::debug!(code, error = %message, "request rejected");
        }
        ApiResponse::error(code, &message, String::new(), 0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use sitewright_core::builder::code::CodeNotFound;
    use sitewright_types::error::RepositoryError;

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_studio_error_status_mapping() {
        assert_eq!(
            status(StudioError::SessionNotFound("s".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(StudioError::InvalidSession("../x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(StudioError::CodeNotFound(CodeNotFound).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(StudioError::Upstream(LlmError::AuthenticationFailed).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(
                StudioError::Upstream(LlmError::RateLimited {
                    retry_after_ms: None
                })
                .into()
            ),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status(StudioError::Storage(RepositoryError::Storage("disk".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_research_error_status_mapping() {
        assert_eq!(
            status(ResearchError::InvalidUrl("nope".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(
                ResearchError::Fetch {
                    url: "https://a.b".into(),
                    message: "timeout".into()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_codes() {
        let (code, msg) = AppError::Studio(StudioError::SessionNotFound("abc".into()))
            .code_and_message();
        assert_eq!(code, "SESSION_NOT_FOUND");
        assert!(msg.contains("abc"));
        assert_eq!(
            AppError::Validation("empty".into()).code_and_message().0,
            "VALIDATION_ERROR"
        );
    }
}
