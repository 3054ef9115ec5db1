//! In-memory session store backed by DashMap.

use dashmap::DashMap;

use sitewright_core::storage::site_store::SiteStore;
use sitewright_types::error::RepositoryError;
use sitewright_types::site::SessionId;

/// Process-lifetime session store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySiteStore {
    sites: DashMap<String, String>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding an artifact.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl SiteStore for MemorySiteStore {
    async fn get(&self, session_id: &SessionId) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .sites
            .get(session_id.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, session_id: &SessionId, source_text: &str) -> Result<(), RepositoryError> {
        self.sites
            .insert(session_id.as_str().to_string(), source_text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemorySiteStore::new();
        let id = SessionId::parse("abc").unwrap();
        assert!(store.get(&id).await.unwrap().is_none());

        store.put(&id, "function App() {}").await.unwrap();
        assert_eq!(
            store.get(&id).await.unwrap().as_deref(),
            Some("function App() {}")
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemorySiteStore::new();
        let id = SessionId::parse("abc").unwrap();
        store.put(&id, "v1").await.unwrap();
        store.put(&id, "v2").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }
}
