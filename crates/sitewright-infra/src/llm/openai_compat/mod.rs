//! OpenAI-compatible chat completions adapter.
//!
//! Gemini (the default backend), OpenAI, Mistral and OpenRouter all speak
//! this wire format; they differ only in base URL and limits, which live in
//! [`config`].

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
    StopConfiguration,
};

use async_openai::error::{ApiError, OpenAIError};

use sitewright_core::llm::provider::LlmProvider;
use sitewright_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, ProviderCapabilities,
    StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Provider for any OpenAI-compatible chat completions endpoint.
///
/// No `Debug`: the client holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_key(&config.api_key)
                .with_api_base(&config.base_url),
        );
        Self {
            client,
            provider_name: config.provider_name,
            model: config.model,
            capabilities: config.capabilities,
        }
    }

    /// Translate a provider-neutral request. The system instruction leads the
    /// message list; an empty request model means the configured one.
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request
            .system
            .iter()
            .map(|text| system_message(text))
            .chain(request.messages.iter().map(chat_message))
            .collect();

        let model = match request.model.as_str() {
            "" => self.model.clone(),
            requested => requested.to_string(),
        };

        let stop = request
            .stop_sequences
            .as_ref()
            .filter(|stops| !stops.is_empty())
            .map(|stops| StopConfiguration::StringArray(stops.clone()));

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            stop,
            ..Default::default()
        }
    }
}

fn system_message(text: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(text.to_string()),
        name: None,
    })
}

fn chat_message(message: &Message) -> ChatCompletionRequestMessage {
    let text = message.content.clone();
    match message.role {
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(text),
            name: None,
        }),
        #[allow(deprecated)]
        MessageRole::Assistant => {
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(text)),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

/// Only a length cut-off matters downstream: the builder warns on truncation.
fn map_finish_reason(reason: Option<&FinishReason>) -> StopReason {
    match reason {
        Some(FinishReason::Length) => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .chat()
            .create(self.build_request(request))
            .await
            .map_err(map_openai_error)?;

        let (content, stop_reason) = match response.choices.first() {
            Some(choice) => (
                choice.message.content.clone().unwrap_or_default(),
                map_finish_reason(choice.finish_reason.as_ref()),
            ),
            None => (String::new(), StopReason::EndTurn),
        };
        let usage = response.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        tracing::debug!(
            provider = %self.provider_name,
            model = %response.model,
            chars = content.len(),
            output_tokens = usage.output_tokens,
            "chat completion received"
        );

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Message fragments different backends use for a rejected key.
const AUTH_MARKERS: [&str; 3] = ["Incorrect API key", "Invalid API key", "API key not valid"];

fn classify_api_error(err: &ApiError) -> LlmError {
    let code = err.code.as_deref().unwrap_or_default();
    let kind = err.r#type.as_deref().unwrap_or_default();
    let message = err.message.as_str();

    if code == "authentication_error"
        || kind == "authentication_error"
        || AUTH_MARKERS.iter().any(|m| message.contains(m))
    {
        LlmError::AuthenticationFailed
    } else if code == "rate_limit_exceeded" || kind == "rate_limit_error" {
        LlmError::RateLimited {
            retry_after_ms: None,
        }
    } else if code == "context_length_exceeded" || message.contains("maximum context length") {
        LlmError::InvalidRequest(message.to_string())
    } else if code == "server_error" || kind == "overloaded_error" {
        LlmError::Overloaded(message.to_string())
    } else {
        LlmError::Provider {
            message: message.to_string(),
        }
    }
}

fn map_openai_error(err: OpenAIError) -> LlmError {
    match err {
        OpenAIError::ApiError(api_err) => classify_api_error(&api_err),
        OpenAIError::Reqwest(e) => match e.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503 | 529) => LlmError::Overloaded(e.to_string()),
            _ => LlmError::Provider {
                message: e.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, body) => {
            LlmError::Deserialization(format!("unexpected response body: {body}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg),
        other => LlmError::Provider {
            message: other.to_string(),
        },
    }
}
