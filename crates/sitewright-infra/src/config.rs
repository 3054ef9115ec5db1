//! Studio configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.sitewright/` in
//! production) and deserializes it into [`StudioConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use secrecy::SecretString;

use sitewright_types::config::StudioConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`StudioConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_studio_config(data_dir: &Path) -> StudioConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return StudioConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return StudioConfig::default();
        }
    };

    match toml::from_str::<StudioConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            StudioConfig::default()
        }
    }
}

/// Read an API key from the named environment variable.
///
/// Blank values count as missing.
pub fn api_key_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewright_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_studio_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(config.max_output_tokens, 16_384);
    }

    #[tokio::test]
    async fn load_studio_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
provider = "anthropic"
provider_name = "anthropic"
api_key_env = "ANTHROPIC_API_KEY"
builder_model = "claude-sonnet-4-5"
default_style = "Brutalist"
"#,
        )
        .await
        .unwrap();

        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.provider, ProviderType::Anthropic);
        assert_eq!(config.builder_model, "claude-sonnet-4-5");
        assert_eq!(config.default_style, "Brutalist");
        // Unset fields keep their defaults
        assert_eq!(config.research_timeout_secs, 10);
    }

    #[tokio::test]
    async fn load_studio_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.provider_name, "gemini");
    }

    #[test]
    fn api_key_from_env_missing_is_none() {
        assert!(api_key_from_env("SITEWRIGHT_TEST_KEY_THAT_IS_NEVER_SET").is_none());
    }
}
