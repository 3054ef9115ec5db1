//! Response cache trait.

use std::future::Future;

use sitewright_types::error::RepositoryError;

/// Key-value cache for idempotent upstream responses (generated images).
///
/// Keys are already normalized by the caller. There is no eviction contract;
/// implementations may hold entries for the process lifetime.
pub trait ResponseCache: Send + Sync {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, RepositoryError>> + Send;

    fn put(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
