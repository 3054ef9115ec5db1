//! Axum router configuration with middleware.
//!
//! JSON routes are under `/api/v1/`. `/api/image` sits outside the versioned
//! prefix because generated source hardcodes that path.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/analyze", post(handlers::analyze::analyze))
        // Sites
        .route("/sites", post(handlers::sites::generate_site))
        .route(
            "/sites/{id}",
            get(handlers::sites::get_site).put(handlers::sites::restore_site),
        )
        .route("/sites/{id}/edit", post(handlers::sites::edit_site))
        .route("/sites/{id}/preview", get(handlers::sites::preview_site))
        .route("/sites/{id}/download", get(handlers::sites::download_site));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/api/image", get(handlers::image::image))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
