//! Code extractor.
//!
//! Model output arrives in unpredictable shapes: prose around a fenced block,
//! a JSON object with a `code` field, or bare code behind a sentence of
//! preamble. Strategies are tried in order and the first match wins; every
//! strategy returns trimmed text so equivalent code extracts identically.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// No source text could be found in the model output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no code found in model output")]
pub struct CodeNotFound;

static FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)```").ok());

static CODE_START: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(?:import|export|function)\b").ok());

/// Isolate source text from raw model output.
pub fn extract_code(raw: &str) -> Result<String, CodeNotFound> {
    from_fence(raw)
        .or_else(|| from_object(raw))
        .or_else(|| from_code_start(raw))
        .ok_or(CodeNotFound)
}

/// The first complete fenced block. A fenced JSON object carrying `code`
/// yields that field instead.
fn from_fence(raw: &str) -> Option<String> {
    let body = FENCE.as_ref()?.captures(raw)?.get(1)?.as_str().trim();
    if body.is_empty() {
        return None;
    }
    Some(code_field(body).unwrap_or_else(|| body.to_string()))
}

/// A single JSON object with a string `code` field, bare or wrapped in prose.
fn from_object(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    code_field(trimmed).or_else(|| {
        let start = trimmed.find('{')?;
        let end = trimmed.rfind('}')?;
        (start < end)
            .then(|| code_field(&trimmed[start..=end]))
            .flatten()
    })
}

fn code_field(candidate: &str) -> Option<String> {
    if !candidate.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(candidate).ok()?;
    let code = value.get("code")?.as_str()?.trim();
    (!code.is_empty()).then(|| code.to_string())
}

/// Everything from the earliest `import`, `export` or `function` keyword.
fn from_code_start(raw: &str) -> Option<String> {
    let start = CODE_START.as_ref()?.find(raw)?.start();
    let code = raw[start..].trim();
    (!code.is_empty()).then(|| code.to_string())
}
