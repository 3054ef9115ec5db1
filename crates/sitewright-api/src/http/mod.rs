//! HTTP/REST API layer for Sitewright.
//!
//! Axum-based REST API at `/api/v1/` with the envelope response format and
//! CORS support, plus the raw `/api/image` route generated pages call.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
