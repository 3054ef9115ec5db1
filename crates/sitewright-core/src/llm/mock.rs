//! Scripted provider for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use sitewright_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use super::provider::LlmProvider;

/// Replays scripted replies in order and records every request it sees.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<(String, StopReason), String>>>,
    pub(crate) requests: std::sync::Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
}

impl ScriptedProvider {
    pub(crate) fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| {
                        r.map(|content| (content.to_string(), StopReason::EndTurn))
                            .map_err(str::to_string)
                    })
                    .collect(),
            ),
            requests: Default::default(),
            capabilities: ProviderCapabilities {
                max_context_tokens: 200_000,
                max_output_tokens: 16_384,
            },
        }
    }

    pub(crate) fn ok(reply: &str) -> Self {
        Self::new(vec![Ok(reply)])
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::new(vec![Err(message)])
    }

    /// A single reply cut off at the output token limit.
    pub(crate) fn truncated(reply: &str) -> Self {
        let provider = Self::new(vec![]);
        provider
            .replies
            .lock()
            .unwrap()
            .push_back(Ok((reply.to_string(), StopReason::MaxTokens)));
        provider
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        match next {
            Ok((content, stop_reason)) => Ok(CompletionResponse {
                id: "scripted-1".to_string(),
                content,
                model: request.model.clone(),
                stop_reason,
                usage: Usage::default(),
            }),
            Err(message) => Err(LlmError::Provider { message }),
        }
    }
}
