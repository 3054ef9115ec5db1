//! In-memory response cache backed by DashMap.

use dashmap::DashMap;

use sitewright_core::storage::cache::ResponseCache;
use sitewright_types::error::RepositoryError;

/// Unbounded process-lifetime cache of upstream response bodies.
///
/// There is no eviction; memory grows with the number of distinct keys.
#[derive(Debug, Default)]
pub struct MemoryResponseCache {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), RepositoryError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_put() {
        let cache = MemoryResponseCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("k").await.unwrap().is_none());

        cache.put("k", vec![1, 2, 3]).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);
    }
}
