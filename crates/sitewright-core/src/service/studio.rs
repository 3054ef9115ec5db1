//! Studio service: the conversation-to-site pipeline.
//!
//! `chat` drives the architect. `generate` and `edit` run one builder call
//! each, then the shared tail: extract code, normalize, store. A failure
//! anywhere in that tail leaves the stored artifact untouched.

use std::sync::Arc;

use tracing::{Instrument, info_span};

use sitewright_types::brief::{Brief, ConversationTurn, ExtractionResult};
use sitewright_types::config::StudioConfig;
use sitewright_types::error::{RepositoryError, ResearchError};
use sitewright_types::llm::{CompletionRequest, LlmError, Message, StopReason};
use sitewright_types::site::{GenerationArtifact, SessionId};

use crate::architect::extractor::RequirementsExtractor;
use crate::builder::code::{CodeNotFound, extract_code};
use crate::builder::edit::synthesize_edit;
use crate::builder::normalize::normalize;
use crate::builder::prompt::{BUILDER_IDENTITY, synthesize};
use crate::llm::box_provider::BoxLlmProvider;
use crate::research::{ResearchSource, detect_url};
use crate::storage::site_store::SiteStore;

/// Errors surfaced by generation, edit and artifact operations.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("upstream model unavailable: {0}")]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    CodeNotFound(#[from] CodeNotFound),

    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("invalid session id: '{0}'")]
    InvalidSession(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Builder call settings.
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub default_style: String,
}

impl From<&StudioConfig> for BuilderSettings {
    fn from(config: &StudioConfig) -> Self {
        Self {
            model: config.builder_model.clone(),
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
            default_style: config.default_style.clone(),
        }
    }
}

/// Service orchestrating the architect conversation and the builder.
///
/// Generic over the session store and research source so that
/// sitewright-core never depends on sitewright-infra.
pub struct StudioService<S: SiteStore, R: ResearchSource> {
    extractor: RequirementsExtractor,
    builder: Arc<BoxLlmProvider>,
    settings: BuilderSettings,
    store: S,
    research: R,
}

impl<S: SiteStore, R: ResearchSource> StudioService<S, R> {
    pub fn new(
        extractor: RequirementsExtractor,
        builder: Arc<BoxLlmProvider>,
        settings: BuilderSettings,
        store: S,
        research: R,
    ) -> Self {
        Self {
            extractor,
            builder,
            settings,
            store,
            research,
        }
    }

    /// Run one architect turn.
    ///
    /// If the message mentions a URL, the page is summarized first and handed
    /// to the extractor as research notes. Research failures are logged and
    /// the turn continues without notes. Never fails.
    pub async fn chat(
        &self,
        history: &[ConversationTurn],
        message: &str,
        current: &Brief,
    ) -> ExtractionResult {
        let research = match detect_url(message) {
            Some(url) => match self.research.summarize(&url).await {
                Ok(summary) => {
                    tracing::info!(url = %url, chars = summary.len(), "research collected");
                    Some(summary)
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "research unavailable, continuing without it");
                    None
                }
            },
            None => None,
        };

        self.extractor
            .extract(current, message, research.as_deref(), history)
            .await
    }

    /// Generate a site from a brief and store it as the session's artifact.
    pub async fn generate(
        &self,
        brief: &Brief,
        style: Option<&str>,
        session_id: &SessionId,
    ) -> Result<GenerationArtifact, StudioError> {
        let style = style
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.settings.default_style.as_str());
        let prompt = synthesize(brief, Some(style));
        tracing::info!(session_id = %session_id, style, "generating site");

        let source_text = self.build(prompt).await?;
        self.store.put(session_id, &source_text).await?;
        tracing::info!(session_id = %session_id, chars = source_text.len(), "site stored");

        Ok(GenerationArtifact {
            session_id: session_id.clone(),
            source_text,
        })
    }

    /// Apply a natural-language edit to the session's current artifact.
    ///
    /// The model must return the full file; truncated replies are stored as-is.
    pub async fn edit(
        &self,
        instruction: &str,
        session_id: &SessionId,
    ) -> Result<GenerationArtifact, StudioError> {
        let current = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| StudioError::SessionNotFound(session_id.to_string()))?;
        tracing::info!(session_id = %session_id, chars = current.len(), "editing site");

        let source_text = self.build(synthesize_edit(&current, instruction)).await?;
        self.store.put(session_id, &source_text).await?;

        Ok(GenerationArtifact {
            session_id: session_id.clone(),
            source_text,
        })
    }

    /// Overwrite the session's artifact with a caller-supplied earlier version.
    pub async fn restore(
        &self,
        session_id: &SessionId,
        source_text: &str,
    ) -> Result<GenerationArtifact, StudioError> {
        self.store.put(session_id, source_text).await?;
        tracing::info!(session_id = %session_id, "site restored");
        Ok(GenerationArtifact {
            session_id: session_id.clone(),
            source_text: source_text.to_string(),
        })
    }

    /// The session's current source text.
    pub async fn source(&self, session_id: &SessionId) -> Result<String, StudioError> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| StudioError::SessionNotFound(session_id.to_string()))
    }

    /// Summarize a reference website directly.
    pub async fn analyze(&self, url: &str) -> Result<String, ResearchError> {
        let url = detect_url(url).ok_or_else(|| ResearchError::InvalidUrl(url.to_string()))?;
        self.research.summarize(&url).await
    }

    /// One builder call followed by code extraction and normalization.
    async fn build(&self, prompt: String) -> Result<String, StudioError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            system: Some(BUILDER_IDENTITY.to_string()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            stop_sequences: None,
        };
        tracing::debug!(chars = request.messages[0].content.len(), "sending builder request");

        let span = info_span!(
            "gen_ai.build_site",
            gen_ai.system = self.builder.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
        );
        let response = self.builder.complete(&request).instrument(span).await?;
        tracing::debug!(
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "builder response received"
        );
        if response.stop_reason == StopReason::MaxTokens {
            tracing::warn!(
                max_tokens = request.max_tokens,
                "builder output hit the token limit and may be truncated"
            );
        }
        let code = extract_code(&response.content)?;
        Ok(normalize(&code))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::mock::ScriptedProvider;
    use crate::research::NoResearch;

    #[derive(Default)]
    struct MapStore {
        sites: Mutex<HashMap<String, String>>,
    }

    impl SiteStore for MapStore {
        async fn get(&self, session_id: &SessionId) -> Result<Option<String>, RepositoryError> {
            Ok(self.sites.lock().unwrap().get(session_id.as_str()).cloned())
        }

        async fn put(&self, session_id: &SessionId, source_text: &str) -> Result<(), RepositoryError> {
            self.sites
                .lock()
                .unwrap()
                .insert(session_id.to_string(), source_text.to_string());
            Ok(())
        }
    }

    struct FixedResearch(&'static str);

    impl ResearchSource for FixedResearch {
        async fn summarize(&self, _url: &str) -> Result<String, ResearchError> {
            Ok(self.0.to_string())
        }
    }

    fn settings() -> BuilderSettings {
        BuilderSettings::from(&StudioConfig::default())
    }

    fn service<R: ResearchSource>(
        architect: ScriptedProvider,
        builder: ScriptedProvider,
        research: R,
    ) -> StudioService<MapStore, R> {
        let extractor = RequirementsExtractor::new(
            Arc::new(BoxLlmProvider::new(architect)),
            "architect".to_string(),
            0.7,
        );
        StudioService::new(
            extractor,
            Arc::new(BoxLlmProvider::new(builder)),
            settings(),
            MapStore::default(),
            research,
        )
    }

    fn session() -> SessionId {
        SessionId::parse("bean-there").unwrap()
    }

    #[tokio::test]
    async fn test_generate_extracts_normalizes_and_stores() {
        let raw = "Here you go:\n```\nimport X\nfunction App(){return <img src=\"a.png\"/>}\n```";
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::ok(raw),
            NoResearch,
        );

        let artifact = svc.generate(&Brief::default(), None, &session()).await.unwrap();

        assert!(artifact.source_text.contains("<SmartImage src=\"a.png\" />"));
        assert!(artifact.source_text.starts_with("import X\nimport SmartImage from './SmartImage';"));
        assert_eq!(svc.source(&session()).await.unwrap(), artifact.source_text);
    }

    #[tokio::test]
    async fn test_generate_uses_default_style() {
        let builder = ScriptedProvider::ok("export default function App() {}");
        let requests = builder.requests.clone();
        let svc = service(ScriptedProvider::new(vec![]), builder, NoResearch);

        svc.generate(&Brief::default(), Some("  "), &session()).await.unwrap();

        let sent = requests.lock().unwrap();
        assert!(sent[0].messages[0].content.contains("\"Modern\""));
        assert_eq!(sent[0].model, "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_generate_without_code_writes_nothing() {
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::ok("Sorry, I can't do that."),
            NoResearch,
        );
        let err = svc.generate(&Brief::default(), None, &session()).await.unwrap_err();
        assert!(matches!(err, StudioError::CodeNotFound(_)));
        assert!(matches!(
            svc.source(&session()).await,
            Err(StudioError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upstream_failure_keeps_previous_artifact() {
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::failing("overloaded"),
            NoResearch,
        );
        svc.restore(&session(), "export default function App() {}")
            .await
            .unwrap();

        let err = svc.edit("make it blue", &session()).await.unwrap_err();
        assert!(matches!(err, StudioError::Upstream(_)));
        assert_eq!(
            svc.source(&session()).await.unwrap(),
            "export default function App() {}"
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_session() {
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
            NoResearch,
        );
        let err = svc.edit("make it blue", &session()).await.unwrap_err();
        assert!(matches!(err, StudioError::SessionNotFound(id) if id == "bean-there"));
    }

    #[tokio::test]
    async fn test_edit_embeds_current_source_and_overwrites() {
        let builder = ScriptedProvider::ok(
            "```jsx\nexport default function App() { return <h1 className=\"text-blue-500\">Hi</h1>; }\n```",
        );
        let requests = builder.requests.clone();
        let svc = service(ScriptedProvider::new(vec![]), builder, NoResearch);
        svc.restore(&session(), "export default function App() { return <h1>Hi</h1>; }")
            .await
            .unwrap();

        let artifact = svc.edit("make the heading blue", &session()).await.unwrap();

        assert!(artifact.source_text.contains("text-blue-500"));
        let sent = requests.lock().unwrap();
        assert!(sent[0].messages[0].content.contains("return <h1>Hi</h1>;"));
        assert!(sent[0].messages[0].content.contains("make the heading blue"));
    }

    #[tokio::test]
    async fn test_edit_stores_cut_off_reply_as_extracted() {
        let builder = ScriptedProvider::truncated(
            "```jsx\nimport React from 'react';\nexport default function App() {\n  return <main><img src=\"a\" /><h1>Bean Th",
        );
        let svc = service(ScriptedProvider::new(vec![]), builder, NoResearch);
        svc.restore(&session(), "export default function App() { return null; }")
            .await
            .unwrap();

        let artifact = svc.edit("add a hero image", &session()).await.unwrap();

        let expected = "import React from 'react';\nimport SmartImage from './SmartImage';\nexport default function App() {\n  return <main><SmartImage src=\"a\" /><h1>Bean Th";
        assert_eq!(artifact.source_text, expected);
        assert_eq!(svc.source(&session()).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_restore_stores_verbatim() {
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
            NoResearch,
        );
        let old = "const a = <img src=\"x\">;";
        svc.restore(&session(), old).await.unwrap();
        assert_eq!(svc.source(&session()).await.unwrap(), old);
    }

    #[tokio::test]
    async fn test_chat_injects_research_for_urls() {
        let architect = ScriptedProvider::ok(r#"{"brief": {"vibe": "Minimal"}}"#);
        let requests = architect.requests.clone();
        let svc = service(
            architect,
            ScriptedProvider::new(vec![]),
            FixedResearch("[RESEARCH_SUMMARY]\nTitle: Blue Bottle"),
        );

        let result = svc
            .chat(&[], "make it like bluebottlecoffee.com", &Brief::default())
            .await;

        assert_eq!(result.brief.vibe.as_deref(), Some("Minimal"));
        let sent = requests.lock().unwrap();
        assert!(sent[0].messages[0].content.contains("<research_notes>"));
    }

    #[tokio::test]
    async fn test_chat_continues_when_research_fails() {
        let architect = ScriptedProvider::ok(r#"{"brief": {"industry": "Coffee"}}"#);
        let requests = architect.requests.clone();
        let svc = service(architect, ScriptedProvider::new(vec![]), NoResearch);

        let result = svc
            .chat(&[], "coffee shop like www.example.com", &Brief::default())
            .await;

        assert_eq!(result.brief.industry.as_deref(), Some("Coffee"));
        let sent = requests.lock().unwrap();
        assert!(!sent[0].messages[0].content.contains("<research_notes>"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_urls() {
        let svc = service(
            ScriptedProvider::new(vec![]),
            ScriptedProvider::new(vec![]),
            FixedResearch("summary"),
        );
        assert!(matches!(
            svc.analyze("not a url").await,
            Err(ResearchError::InvalidUrl(_))
        ));
        assert_eq!(svc.analyze("stripe.com").await.unwrap(), "summary");
    }
}
