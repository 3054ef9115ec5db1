//! The architect: converges a free-form conversation into a [`Brief`].
//!
//! [`Brief`]: sitewright_types::brief::Brief

pub mod brief;
pub mod extractor;
pub mod prompt;
