//! Business logic and collaborator trait definitions for Sitewright.
//!
//! This crate holds the conversation-to-site pipeline and defines the "ports"
//! (provider, store, cache, research and image traits) that the
//! infrastructure layer implements. It depends only on `sitewright-types`,
//! never on `sitewright-infra` or any network/IO crate.

pub mod architect;
pub mod builder;
pub mod image;
pub mod llm;
pub mod research;
pub mod service;
pub mod storage;
