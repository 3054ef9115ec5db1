//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `sitewright-core`, a provider factory ([`create_provider`]) that builds
//! the right provider from a [`ProviderConfig`], and a connection check
//! ([`test_provider_connection`]) used by the CLI.
//!
//! [`LlmProvider`]: sitewright_core::llm::provider::LlmProvider

pub mod anthropic;
pub mod openai_compat;

use secrecy::SecretString;

use sitewright_core::llm::box_provider::BoxLlmProvider;
use sitewright_types::llm::{CompletionRequest, LlmError, Message, ProviderConfig, ProviderType};

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::defaults_for;

/// Create a [`BoxLlmProvider`] from a [`ProviderConfig`].
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is provided.
pub fn create_provider(
    config: &ProviderConfig,
    api_key: Option<&str>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    match config.provider_type {
        ProviderType::Anthropic => {
            let secret = SecretString::from(key.to_string());
            let mut provider = AnthropicProvider::new(secret, config.model.clone());
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url.to_string());
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let mut oai_config = defaults_for(&config.name, key, &config.model);
            if let Some(base_url) = config.base_url.as_deref() {
                oai_config = oai_config.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
        }
    }
}

/// Test provider connectivity by sending a minimal completion request.
///
/// Sends a tiny "Hello" message with a minimal token budget.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let request = CompletionRequest {
        // Provider uses its configured default
        model: String::new(),
        messages: vec![Message::user("Hello")],
        system: None,
        max_tokens: 10,
        temperature: Some(0.0),
        stop_sequences: None,
    };
    provider.complete(&request).await?;
    Ok(())
}
