//! Requirements extractor.
//!
//! One model call per turn turns the user's message into brief values. The
//! model only ever supplies data: sanitizing, merging, choosing the next
//! question and deciding completeness all happen here, deterministically.

use std::sync::Arc;

use serde_json::Value;
use tracing::{Instrument, info_span};

use sitewright_types::brief::{Brief, ConversationTurn, ExtractionResult};
use sitewright_types::llm::{CompletionRequest, LlmError, Message};

use crate::architect::brief::{BriefExt, acknowledgement, question_for, sanitize_brief};
use crate::architect::prompt::{build_architect_system_prompt, build_extraction_message};
use crate::llm::box_provider::BoxLlmProvider;

/// Reply sent once every required field is known.
pub const COMPLETION_REPLY: &str = "I have drafted a plan based on our conversation. \
Please review the brief below, edit if needed, and confirm to build.";

/// Reply sent when the model call fails or returns something unusable.
pub const RETRY_REPLY: &str = "Could you repeat that?";

/// Output budget for the extraction call. The payload is a small object.
const EXTRACTION_MAX_TOKENS: u32 = 2048;

/// Reasons an extraction turn failed. Never escapes [`RequirementsExtractor::extract`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("model call failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("model output is not valid JSON: {0}")]
    Parse(String),

    #[error("model output has no 'brief' object")]
    MissingBrief,
}

/// Drives one architect turn against a text-generation provider.
pub struct RequirementsExtractor {
    provider: Arc<BoxLlmProvider>,
    model: String,
    temperature: f64,
}

impl RequirementsExtractor {
    pub fn new(provider: Arc<BoxLlmProvider>, model: String, temperature: f64) -> Self {
        Self {
            provider,
            model,
            temperature,
        }
    }

    /// Run one turn.
    ///
    /// On any failure the brief is returned unchanged with the generic retry
    /// reply. When `research` is present, merging follows
    /// [`BriefExt::merged_with_research`].
    pub async fn extract(
        &self,
        current: &Brief,
        user_message: &str,
        research: Option<&str>,
        history: &[ConversationTurn],
    ) -> ExtractionResult {
        let extracted = match self
            .call_model(current, user_message, research, history)
            .await
        {
            Ok(brief) => brief,
            Err(e) => {
                tracing::warn!(error = %e, "brief extraction failed");
                return ExtractionResult {
                    brief: current.clone(),
                    reply: RETRY_REPLY.to_string(),
                    is_complete: false,
                };
            }
        };

        let brief = if research.is_some() {
            current.merged_with_research(&extracted, user_message)
        } else {
            current.merged_with(&extracted)
        };

        let (reply, is_complete) = next_reply(current, &brief);
        tracing::info!(
            populated = brief.populated_fields().len(),
            is_complete,
            "architect turn processed"
        );

        ExtractionResult {
            brief,
            reply,
            is_complete,
        }
    }

    async fn call_model(
        &self,
        current: &Brief,
        user_message: &str,
        research: Option<&str>,
        history: &[ConversationTurn],
    ) -> Result<Brief, ExtractionError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(build_extraction_message(
                current,
                user_message,
                research,
                history,
            ))],
            system: Some(build_architect_system_prompt()),
            max_tokens: EXTRACTION_MAX_TOKENS,
            temperature: Some(self.temperature),
            stop_sequences: None,
        };
        tracing::debug!(
            chars = request.messages[0].content.len(),
            research = research.is_some(),
            "sending extraction request"
        );

        let span = info_span!(
            "gen_ai.extract_brief",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
        );
        let response = self.provider.complete(&request).instrument(span).await?;
        parse_extraction(&response.content)
    }
}

/// Parse the model's reply into a sanitized brief.
///
/// Surrounding markdown fences are removed; the JSON itself is never repaired.
pub fn parse_extraction(raw: &str) -> Result<Brief, ExtractionError> {
    let value: Value = serde_json::from_str(strip_fences(raw))
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;
    let brief = value
        .get("brief")
        .and_then(Value::as_object)
        .ok_or(ExtractionError::MissingBrief)?;
    Ok(sanitize_brief(brief))
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Pick the reply and completeness flag for the merged brief.
fn next_reply(before: &Brief, after: &Brief) -> (String, bool) {
    match after.first_missing() {
        None => (COMPLETION_REPLY.to_string(), true),
        Some(field) => {
            tracing::info!(missing_field = %field, "asking for next field");
            let question = question_for(field);
            let reply = match acknowledgement(after, &after.changed_since(before)) {
                Some(ack) => format!("{ack} {question}"),
                None => question.to_string(),
            };
            (reply, false)
        }
    }
}
