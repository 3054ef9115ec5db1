//! HTTP request handlers for the REST API.

pub mod analyze;
pub mod chat;
pub mod image;
pub mod sites;
