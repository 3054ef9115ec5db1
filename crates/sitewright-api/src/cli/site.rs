//! Site commands: edit and show.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use console::style;

use sitewright_core::storage::site_store::SiteStore;
use sitewright_infra::storage::FsSiteStore;
use sitewright_types::site::SessionId;

use crate::cli::spinner;
use crate::state::AppState;

/// Apply an edit instruction to a stored site.
pub async fn edit_site(
    state: &AppState,
    session: &str,
    instruction: &str,
    json: bool,
) -> Result<()> {
    let session_id = SessionId::parse(session).map_err(|e| anyhow!(e))?;
    if instruction.trim().is_empty() {
        bail!("edit instruction is empty");
    }

    let working = spinner("Applying edit...");
    let artifact = state.studio.edit(instruction, &session_id).await;
    working.finish_and_clear();
    let artifact = artifact?;

    if json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Edit applied to {}",
        style("✓").green().bold(),
        style(&artifact.session_id).cyan()
    );
    println!(
        "  {}  {} characters",
        style("Source:").bold(),
        artifact.source_text.len()
    );
    println!();
    Ok(())
}

/// Print a stored site's source, or the path of its preview page.
///
/// Reads the filesystem store directly; no provider is needed.
pub async fn show_site(data_dir: &Path, session: &str, preview: bool, json: bool) -> Result<()> {
    let session_id = SessionId::parse(session).map_err(|e| anyhow!(e))?;
    let store = FsSiteStore::new(data_dir);
    let Some(source) = store.get(&session_id).await? else {
        bail!("session '{session_id}' not found");
    };
    let preview_path = store.preview_path(&session_id);

    if json {
        let out = serde_json::json!({
            "session_id": session_id,
            "source_text": source,
            "preview_path": preview_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if preview {
        println!("{}", preview_path.display());
    } else {
        println!("{source}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_show_missing_session_fails() {
        let tmp = TempDir::new().unwrap();
        let err = show_site(tmp.path(), "nope", false, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_show_rejects_path_traversal() {
        let tmp = TempDir::new().unwrap();
        assert!(show_site(tmp.path(), "../etc", false, false).await.is_err());
    }

    #[tokio::test]
    async fn test_show_existing_session() {
        let tmp = TempDir::new().unwrap();
        let store = FsSiteStore::new(tmp.path());
        let id = SessionId::parse("s1").unwrap();
        store.put(&id, "function App() {}").await.unwrap();
        assert!(show_site(tmp.path(), "s1", true, false).await.is_ok());
    }
}
