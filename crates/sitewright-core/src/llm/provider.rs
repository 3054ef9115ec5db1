//! LlmProvider trait definition.
//!
//! This is the core abstraction that all text-generation backends implement.
//! Uses RPITIT for `complete`; `BoxLlmProvider` supplies dynamic dispatch.

use sitewright_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for LLM provider backends (Anthropic, OpenAI-compatible, etc.).
///
/// Every call is treated as unreliable: callers must handle errors and
/// malformed output. Implementations live in sitewright-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "gemini").
    fn name(&self) -> &str;

    /// Context and output limits of this provider.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
