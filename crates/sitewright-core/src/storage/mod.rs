//! Persistence ports for generated sites and cached responses.

pub mod cache;
pub mod site_store;
