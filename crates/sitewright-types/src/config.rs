//! Studio configuration types.
//!
//! `StudioConfig` represents the `config.toml` in the data directory. It
//! selects the text-generation backend, the models used for the architect
//! conversation and the builder, and the image/research adapters.

use serde::{Deserialize, Serialize};

use crate::llm::{ProviderConfig, ProviderType};
use crate::site::DEFAULT_STYLE;

/// Top-level configuration for Sitewright.
///
/// Loaded from `~/.sitewright/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Backend type used for every text-generation call.
    #[serde(default = "default_provider")]
    pub provider: ProviderType,

    /// Human-readable provider name; selects base URL defaults for
    /// OpenAI-compatible backends ("gemini", "openai", "openrouter", ...).
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Fast model used to extract the brief from conversation.
    #[serde(default = "default_architect_model")]
    pub architect_model: String,

    /// Creative model used to generate and edit site source.
    #[serde(default = "default_builder_model")]
    pub builder_model: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Style label used when a generate request names none.
    #[serde(default = "default_style")]
    pub default_style: String,

    /// Raster image model served behind `/api/image`.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Environment variable holding the image API key. Falls back to
    /// `api_key_env` when unset.
    #[serde(default)]
    pub image_api_key_env: Option<String>,

    /// Timeout for fetching a reference website, in seconds.
    #[serde(default = "default_research_timeout_secs")]
    pub research_timeout_secs: u64,
}

fn default_provider() -> ProviderType {
    ProviderType::OpenAiCompatible
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_architect_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_builder_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_max_output_tokens() -> u32 {
    16_384
}

fn default_temperature() -> f64 {
    0.7
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-preview-06-06".to_string()
}

fn default_research_timeout_secs() -> u64 {
    10
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            provider_name: default_provider_name(),
            base_url: None,
            api_key_env: default_api_key_env(),
            architect_model: default_architect_model(),
            builder_model: default_builder_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            default_style: default_style(),
            image_model: default_image_model(),
            image_api_key_env: None,
            research_timeout_secs: default_research_timeout_secs(),
        }
    }
}

impl StudioConfig {
    /// Provider configuration for the given model.
    pub fn provider_config(&self, model: &str) -> ProviderConfig {
        ProviderConfig {
            name: self.provider_name.clone(),
            provider_type: self.provider.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
        }
    }

    /// The environment variable to read the image API key from.
    pub fn image_key_env(&self) -> &str {
        self.image_api_key_env
            .as_deref()
            .unwrap_or(self.api_key_env.as_str())
    }
}
