//! Data directory resolution.

use std::path::PathBuf;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SITEWRIGHT_DATA_DIR` environment variable
/// 2. `~/.sitewright`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SITEWRIGHT_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".sitewright");
    }

    // Last resort: current directory
    PathBuf::from(".sitewright")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_ends_with_app_dir() {
        // The env override is process-global; only assert on the default shape.
        if std::env::var("SITEWRIGHT_DATA_DIR").is_err() {
            assert!(resolve_data_dir().ends_with(".sitewright"));
        }
    }
}
