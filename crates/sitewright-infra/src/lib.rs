//! Infrastructure layer for Sitewright.
//!
//! Contains implementations of the collaborator traits defined in
//! `sitewright-core`: LLM provider clients, filesystem and in-memory site
//! stores, the image response cache, the HTML researcher, the raster image
//! generator, the static preview wrapper and the download archive.

pub mod cache;
pub mod config;
pub mod export;
pub mod filesystem;
pub mod image;
pub mod llm;
pub mod preview;
pub mod research;
pub mod storage;
