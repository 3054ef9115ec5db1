//! Session artifact persistence trait.
//!
//! A session owns one current source text. The store is last-write-wins:
//! concurrent writers for the same session may clobber each other, and no
//! per-session serialization is provided by the core.

use std::future::Future;

use sitewright_types::error::RepositoryError;
use sitewright_types::site::SessionId;

/// Persistence interface for the current generated source of a session.
///
/// Uses RPITIT consistent with all async traits in this project.
pub trait SiteStore: Send + Sync {
    /// Load the current source for a session.
    ///
    /// Returns `None` if nothing has been generated for the session yet.
    fn get(
        &self,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Store (or overwrite) the current source for a session.
    fn put(
        &self,
        session_id: &SessionId,
        source_text: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
