//! Connection settings for OpenAI-compatible backends.
//!
//! Well-known backends are looked up by name in [`KNOWN_BACKENDS`]; any other
//! name gets the OpenAI endpoint and limits, and usually a `base_url`
//! override in `config.toml` (a local Ollama or vLLM server, for example).

use sitewright_types::llm::ProviderCapabilities;

/// Everything needed to build an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    pub provider_name: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

impl OpenAiCompatConfig {
    /// Replace the base URL, keeping every other default.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Endpoint and limits of a well-known backend.
#[derive(Debug, Clone, Copy)]
pub struct KnownBackend {
    pub name: &'static str,
    pub base_url: &'static str,
    pub max_context_tokens: u32,
    pub max_output_tokens: u32,
}

/// OpenRouter limits depend on the routed model; OpenAI's are assumed.
pub const KNOWN_BACKENDS: [KnownBackend; 4] = [
    KnownBackend {
        name: "gemini",
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        max_context_tokens: 1_000_000,
        max_output_tokens: 65_536,
    },
    KnownBackend {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        max_context_tokens: 128_000,
        max_output_tokens: 16_384,
    },
    KnownBackend {
        name: "mistral",
        base_url: "https://api.mistral.ai/v1",
        max_context_tokens: 128_000,
        max_output_tokens: 32_768,
    },
    KnownBackend {
        name: "openrouter",
        base_url: "https://openrouter.ai/api/v1",
        max_context_tokens: 128_000,
        max_output_tokens: 16_384,
    },
];

const FALLBACK_BACKEND: usize = 1;

/// Settings for the backend called `name`. Unknown names keep their own name
/// with OpenAI's endpoint and limits.
pub fn defaults_for(name: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    let backend = KNOWN_BACKENDS
        .iter()
        .find(|b| b.name == name)
        .unwrap_or(&KNOWN_BACKENDS[FALLBACK_BACKEND]);

    OpenAiCompatConfig {
        provider_name: name.to_string(),
        base_url: backend.base_url.to_string(),
        api_key: api_key.to_string(),
        model: model.to_string(),
        capabilities: ProviderCapabilities {
            max_context_tokens: backend.max_context_tokens,
            max_output_tokens: backend.max_output_tokens,
        },
    }
}
