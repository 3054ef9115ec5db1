//! Reference-website research port.
//!
//! The architect may be handed a URL mid-conversation. A `ResearchSource`
//! turns that page into a plain-text summary which is injected into the
//! extraction instruction as annotation, never as user speech.

use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;

use sitewright_types::error::ResearchError;

/// Summarizes a web page for the requirements extractor.
pub trait ResearchSource: Send + Sync {
    fn summarize(&self, url: &str) -> impl Future<Output = Result<String, ResearchError>> + Send;
}

/// A research source that never has anything to say.
///
/// Used by the CLI when research is disabled and by tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResearch;

impl ResearchSource for NoResearch {
    async fn summarize(&self, url: &str) -> Result<String, ResearchError> {
        Err(ResearchError::Fetch {
            url: url.to_string(),
            message: "research disabled".to_string(),
        })
    }
}

static URL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(https?://\S+)|(www\.\S+)|([a-zA-Z0-9-]+\.[a-z]{2,}\S*)").ok()
});

/// Find the first URL-looking token in a message.
///
/// Accepts `http(s)://` links, `www.` hosts and naked domains. Trailing
/// sentence punctuation is stripped and `https://` is prepended when no
/// scheme is present.
pub fn detect_url(message: &str) -> Option<String> {
    let found = URL_RE.as_ref()?.find(message)?;
    let trimmed = found
        .as_str()
        .trim_end_matches(['.', ',', '!', '?', ';', ':', ')', '"', '\'']);
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}
