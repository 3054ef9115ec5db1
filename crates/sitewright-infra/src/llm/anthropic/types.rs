//! Messages API wire types.
//!
//! Requests borrow from the provider-neutral [`CompletionRequest`] so a
//! long builder prompt is serialized without being copied.

use serde::{Deserialize, Serialize};

use sitewright_types::llm::{CompletionRequest, CompletionResponse, StopReason, Usage};

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// `fallback_model` applies when the request names none.
    pub fn from_completion(request: &'a CompletionRequest, fallback_model: &'a str) -> Self {
        Self {
            model: if request.model.is_empty() {
                fallback_model
            } else {
                &request.model
            },
            max_tokens: request.max_tokens,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            system: request.system.as_deref(),
            temperature: request.temperature,
            stop_sequences: request
                .stop_sequences
                .as_deref()
                .filter(|stops| !stops.is_empty()),
        }
    }
}

/// Response content block. Only text is consumed; thinking and tool blocks
/// are skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: WireUsage,
}

impl MessagesResponse {
    pub fn into_completion(self) -> CompletionResponse {
        let content = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<String>();

        let stop_reason = match self.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        CompletionResponse {
            id: self.id,
            content,
            model: self.model,
            stop_reason,
            usage: Usage {
                input_tokens: self.usage.input_tokens,
                output_tokens: self.usage.output_tokens,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewright_types::llm::Message;

    fn completion(model: &str) -> CompletionRequest {
        CompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user("Hi")],
            system: None,
            max_tokens: 1024,
            temperature: None,
            stop_sequences: Some(vec![]),
        }
    }

    #[test]
    fn test_request_skips_empty_options() {
        let req = completion("claude-sonnet-4-5");
        let json = serde_json::to_value(MessagesRequest::from_completion(&req, "fallback")).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-5");
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
        assert!(json.get("stop_sequences").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hi");
    }

    #[test]
    fn test_request_model_fallback() {
        let req = completion("");
        let wire = MessagesRequest::from_completion(&req, "claude-haiku-4-5");
        assert_eq!(wire.model, "claude-haiku-4-5");
    }

    #[test]
    fn test_response_joins_text_blocks() {
        let json = r#"{
            "id": "msg_1",
            "model": "claude-sonnet-4-5",
            "stop_reason": "max_tokens",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "export default "},
                {"type": "text", "text": "function App() {}"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json).unwrap();
        let completion = resp.into_completion();
        assert_eq!(completion.content, "export default function App() {}");
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage.input_tokens, 12);
    }

    #[test]
    fn test_response_without_usage() {
        let json = r#"{"id": "m", "model": "x", "stop_reason": null, "content": []}"#;
        let completion = serde_json::from_str::<MessagesResponse>(json)
            .unwrap()
            .into_completion();
        assert_eq!(completion.content, "");
        assert_eq!(completion.stop_reason, StopReason::EndTurn);
        assert_eq!(completion.usage.output_tokens, 0);
    }
}
