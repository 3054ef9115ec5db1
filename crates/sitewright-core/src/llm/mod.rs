//! LLM provider abstraction.

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod mock;
