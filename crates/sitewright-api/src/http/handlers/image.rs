//! Raw image route called by generated pages through `SmartImage`.
//!
//! Always answers with `image/png`. An empty prompt is rejected; any other
//! failure, or a missing image key, yields the transparent placeholder so
//! the page never shows a broken image.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use sitewright_infra::image::transparent_pixel;
use sitewright_types::error::ImageError;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    #[serde(default)]
    pub prompt: String,
}

fn png(bytes: Vec<u8>, cache_control: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, cache_control),
        ],
        bytes,
    )
        .into_response()
}

/// The transparent fallback. Never cached, so a later request can succeed.
fn placeholder() -> Response {
    png(transparent_pixel(), "no-store")
}

/// GET /api/image?prompt=... - Generate (or recall) an image for a prompt.
pub async fn image(State(state): State<AppState>, Query(query): Query<ImageQuery>) -> Response {
    let Some(images) = state.images.as_ref() else {
        if query.prompt.trim().is_empty() {
            return AppError::Validation("prompt must not be empty".to_string()).into_response();
        }
        return placeholder();
    };

    match images.image(&query.prompt).await {
        Ok(bytes) => png(bytes, "public, max-age=86400"),
        Err(ImageError::EmptyPrompt) => {
            AppError::Validation("prompt must not be empty".to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, prompt = %query.prompt, "image generation failed, serving placeholder");
            placeholder()
        }
    }
}
