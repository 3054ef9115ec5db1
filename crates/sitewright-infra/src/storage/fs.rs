//! Filesystem session store.
//!
//! Layout: `{root}/sites/{session_id}/app.jsx` holds the current source and
//! `index.html` next to it holds a standalone preview page.

use std::path::{Path, PathBuf};

use sitewright_core::storage::site_store::SiteStore;
use sitewright_types::error::RepositoryError;
use sitewright_types::site::SessionId;

use crate::preview::render_preview;

const SOURCE_FILE: &str = "app.jsx";
const PREVIEW_FILE: &str = "index.html";

/// Session store writing one directory per session under the data dir.
#[derive(Debug, Clone)]
pub struct FsSiteStore {
    root: PathBuf,
}

impl FsSiteStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join("sites"),
        }
    }

    /// Directory holding the files for one session.
    ///
    /// `SessionId` only admits path-safe characters.
    pub fn site_dir(&self, session_id: &SessionId) -> PathBuf {
        self.root.join(session_id.as_str())
    }

    /// Path of the rendered preview page for a session.
    pub fn preview_path(&self, session_id: &SessionId) -> PathBuf {
        self.site_dir(session_id).join(PREVIEW_FILE)
    }
}

fn storage_err(path: &Path, err: std::io::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {err}", path.display()))
}

impl SiteStore for FsSiteStore {
    async fn get(&self, session_id: &SessionId) -> Result<Option<String>, RepositoryError> {
        let path = self.site_dir(session_id).join(SOURCE_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(Some(source)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_err(&path, err)),
        }
    }

    async fn put(&self, session_id: &SessionId, source_text: &str) -> Result<(), RepositoryError> {
        let dir = self.site_dir(session_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_err(&dir, e))?;

        let source_path = dir.join(SOURCE_FILE);
        tokio::fs::write(&source_path, source_text)
            .await
            .map_err(|e| storage_err(&source_path, e))?;

        let preview_path = dir.join(PREVIEW_FILE);
        tokio::fs::write(&preview_path, render_preview(source_text))
            .await
            .map_err(|e| storage_err(&preview_path, e))?;

        tracing::debug!(
            session_id = %session_id,
            chars = source_text.len(),
            "site written to {}",
            dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FsSiteStore::new(tmp.path());
        let id = SessionId::parse("nothing-here").unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_writes_source_and_preview() {
        let tmp = TempDir::new().unwrap();
        let store = FsSiteStore::new(tmp.path());
        let id = SessionId::parse("s1").unwrap();
        let source = "export default function App() { return <h1>Hi</h1>; }";

        store.put(&id, source).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap().as_deref(), Some(source));
        let on_disk = std::fs::read_to_string(tmp.path().join("sites/s1/app.jsx")).unwrap();
        assert_eq!(on_disk, source);
        let preview = std::fs::read_to_string(store.preview_path(&id)).unwrap();
        assert!(preview.contains("function App() { return <h1>Hi</h1>; }"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = FsSiteStore::new(tmp.path());
        let id = SessionId::parse("s1").unwrap();
        store.put(&id, "v1").await.unwrap();
        store.put(&id, "v2").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().as_deref(), Some("v2"));
    }
}
