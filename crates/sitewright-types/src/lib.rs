//! Shared domain types for Sitewright.
//!
//! This crate contains the core domain types used across the Sitewright
//! pipeline: the project Brief, conversation turns, extraction results,
//! generated site artifacts, LLM request/response shapes, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod brief;
pub mod config;
pub mod error;
pub mod llm;
pub mod site;
