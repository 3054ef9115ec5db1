//! HTML research adapter.
//!
//! Fetches a reference page and reduces it to a short plain-text summary:
//! title, meta description, likely offerings (nav links, list items, h3
//! headings), visual hints from utility classes, and a few long paragraphs.
//! Extraction is text-level; no DOM is built.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use sitewright_core::research::ResearchSource;
use sitewright_types::error::ResearchError;

const USER_AGENT: &str = "Mozilla/5.0";
const MAX_OFFERINGS: usize = 15;
const MAX_SNIPPETS: usize = 6;
const MIN_SNIPPET_CHARS: usize = 61;

/// Elements removed before any text is read.
const NOISE_TAGS: [&str; 6] = ["script", "style", "svg", "noscript", "iframe", "footer"];

static NOISE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_TAGS
        .iter()
        .filter_map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).ok())
        .collect()
});

static TITLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").ok());

static META_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").ok());

static DESCRIPTION_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)\bname\s*=\s*["']description["']"#).ok());

static CONTENT_ATTR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).ok());

static NAV: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<nav\b[^>]*>(.*?)</nav\s*>").ok());

static ANCHOR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a\s*>").ok());

static LIST_ITEM: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li\s*>").ok());

static HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<h3\b[^>]*>(.*?)</h3\s*>").ok());

static PARAGRAPH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").ok());

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Fetches reference pages over HTTP and summarizes them.
pub struct HtmlResearcher {
    client: reqwest::Client,
}

impl HtmlResearcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<String, ResearchError> {
        let fetch_err = |message: String| ResearchError::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| fetch_err(e.to_string()))
    }
}

impl ResearchSource for HtmlResearcher {
    async fn summarize(&self, url: &str) -> Result<String, ResearchError> {
        if reqwest::Url::parse(url).is_err() {
            return Err(ResearchError::InvalidUrl(url.to_string()));
        }

        tracing::info!(url, "analyzing reference site");
        let html = self.fetch(url).await?;
        let summary = summarize_html(&html);
        tracing::debug!(url, chars = summary.len(), "research summary ready");
        Ok(summary)
    }
}

/// Reduce an HTML document to a `[RESEARCH_SUMMARY]` block.
pub fn summarize_html(html: &str) -> String {
    let cleaned = strip_noise(html);

    let title = TITLE
        .as_ref()
        .and_then(|re| re.captures(&cleaned))
        .and_then(|c| c.get(1))
        .map(|m| text_of(m.as_str()))
        .unwrap_or_default();

    let description = meta_description(&cleaned).unwrap_or_default();
    let offerings = offerings(&cleaned);
    let vibe = implied_vibe(&cleaned);
    let snippets = snippets(&cleaned);

    format!(
        "[RESEARCH_SUMMARY]\n\
         - **Source:** {title}\n\
         - **Intro:** {description}\n\
         - **Detected Offerings:** {}\n\
         - **Implied Vibe:** {vibe}\n\
         - **Content Snippets:** {}",
        offerings.join(", "),
        snippets.join("\n\n"),
    )
}

fn strip_noise(html: &str) -> String {
    NOISE.iter().fold(html.to_string(), |acc, re| {
        re.replace_all(&acc, "").into_owned()
    })
}

fn meta_description(html: &str) -> Option<String> {
    let description = DESCRIPTION_NAME.as_ref()?;
    let content = CONTENT_ATTR.as_ref()?;
    META_TAG
        .as_ref()?
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|tag| description.is_match(tag))
        .find_map(|tag| {
            let caps = content.captures(tag)?;
            let value = caps.get(1).or_else(|| caps.get(2))?;
            Some(decode_entities(value.as_str()).trim().to_string())
        })
}

/// Short labels from nav links, list items and h3 headings, in document
/// order, deduplicated.
fn offerings(html: &str) -> Vec<String> {
    let mut candidates: Vec<(usize, String)> = Vec::new();

    if let (Some(nav), Some(anchor)) = (NAV.as_ref(), ANCHOR.as_ref()) {
        for block in nav.captures_iter(html) {
            let Some(inner) = block.get(1) else { continue };
            for a in anchor.captures_iter(inner.as_str()) {
                if let Some(text) = a.get(1) {
                    candidates.push((inner.start() + text.start(), text_of(text.as_str())));
                }
            }
        }
    }
    for re in [LIST_ITEM.as_ref(), HEADING.as_ref()].into_iter().flatten() {
        for caps in re.captures_iter(html) {
            if let Some(text) = caps.get(1) {
                candidates.push((text.start(), text_of(text.as_str())));
            }
        }
    }
    candidates.sort_by_key(|(pos, _)| *pos);

    let mut found: Vec<String> = Vec::new();
    for (_, text) in candidates {
        let len = text.chars().count();
        if (4..30).contains(&len) && !found.contains(&text) {
            found.push(text);
            if found.len() == MAX_OFFERINGS {
                break;
            }
        }
    }
    found
}

fn implied_vibe(html: &str) -> String {
    let mut vibe = String::from("Neutral");
    if html.contains("font-serif") {
        vibe.push_str(", Serif/Classic");
    }
    if html.contains("dark") || html.contains("bg-black") {
        vibe.push_str(", Dark Mode");
    }
    if html.contains("tracking-tighter") {
        vibe.push_str(", Modern/Tight");
    }
    vibe
}

fn snippets(html: &str) -> Vec<String> {
    let Some(paragraph) = PARAGRAPH.as_ref() else {
        return Vec::new();
    };
    paragraph
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| text_of(m.as_str()))
        .filter(|t| t.chars().count() >= MIN_SNIPPET_CHARS)
        .take(MAX_SNIPPETS)
        .collect()
}

/// Visible text of an HTML fragment with whitespace collapsed.
fn text_of(fragment: &str) -> String {
    let stripped = match TAG.as_ref() {
        Some(re) => re.replace_all(fragment, " ").into_owned(),
        None => fragment.to_string(),
    };
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
