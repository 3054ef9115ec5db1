//! Anthropic Messages API provider.
//!
//! The API key is a [`SecretString`] and is exposed only while building the
//! request header.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};

use sitewright_core::llm::provider::LlmProvider;
use sitewright_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

use super::types::{MessagesRequest, MessagesResponse};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Full-page generations are long.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl AnthropicProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            capabilities: capabilities_for(&model),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Point at a proxy or a local test server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// Output limits by model family; unknown models get a conservative cap.
fn capabilities_for(model: &str) -> ProviderCapabilities {
    let max_output_tokens = [("opus", 32_000), ("sonnet", 8_192), ("haiku", 8_192)]
        .iter()
        .find(|(family, _)| model.contains(family))
        .map_or(4_096, |(_, limit)| *limit);
    ProviderCapabilities {
        max_context_tokens: 200_000,
        max_output_tokens,
    }
}

/// `retry-after` is whole seconds on this API.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1000)
}

fn status_error(status: reqwest::StatusCode, retry_after_ms: Option<u64>, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        400 => LlmError::InvalidRequest(body),
        529 => LlmError::Overloaded(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest::from_completion(request, &self.model))
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("request to anthropic failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, retry, body));
        }

        let completion = response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| LlmError::Deserialization(format!("unexpected messages response: {e}")))?
            .into_completion();

        tracing::debug!(
            model = %completion.model,
            chars = completion.content.len(),
            output_tokens = completion.usage.output_tokens,
            "anthropic completion received"
        );
        Ok(completion)
    }
}
