//! Architect extraction prompt builder.
//!
//! The system prompt is split into XML-tagged sections: identity, extraction
//! rules and the output schema. The per-turn user content carries the current
//! brief, recent conversation, optional research notes and the user message,
//! each in its own tag so research is never mistaken for user speech.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sitewright_types::brief::{Brief, ChatRole, ConversationTurn};

/// Number of prior turns included as conversation context.
const RECENT_TURNS: usize = 5;

/// The single object the extraction call must return.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionPayload {
    /// The updated brief. Use null for anything not known.
    pub brief: Brief,
}

/// JSON schema for [`ExtractionPayload`], pretty-printed.
pub fn extraction_schema() -> String {
    let schema = schemars::schema_for!(ExtractionPayload);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

const ARCHITECT_IDENTITY: &str = "You are the Architect, a data extraction engine for a website studio. \
Your only job is to fill in a project brief from what the user tells you. You do not chat, \
you do not ask questions and you never decide when the brief is finished.";

const EXTRACTION_RULES: &str = r#"1. Infer when obvious. "I run a coffee shop" means industry "Coffee shop" and you MAY suggest sections such as "Home, Menu, Location".
2. Never invent a name, audience or vibe the user has not given or clearly implied. Leave it null.
3. Keep every value in <current_brief> unless the user changes it in <user_message>.
4. <research_notes>, when present, describe a reference website. Use them to fill EMPTY fields (vibe, context, reference). What the user says always wins over research.
5. sections is a comma separated list of page names.
6. context holds concrete facts (founding year, products, prices, location) to weave into the copy.
7. Respond with a single JSON object matching <output_schema>. No prose, no markdown."#;

/// Build the architect system prompt.
pub fn build_architect_system_prompt() -> String {
    let sections = [
        format!("<architect_identity>\n{ARCHITECT_IDENTITY}\n</architect_identity>"),
        format!("<extraction_rules>\n{EXTRACTION_RULES}\n</extraction_rules>"),
        format!("<output_schema>\n{}\n</output_schema>", extraction_schema()),
    ];
    sections.join("\n\n")
}

/// Format the last few turns as `role: text` lines.
pub fn conversation_summary(history: &[ConversationTurn]) -> String {
    let start = history.len().saturating_sub(RECENT_TURNS);
    history[start..]
        .iter()
        .map(|turn| {
            let who = match turn.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Architect",
            };
            format!("{who}: {}", turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the per-turn extraction message.
pub fn build_extraction_message(
    current: &Brief,
    user_message: &str,
    research: Option<&str>,
    history: &[ConversationTurn],
) -> String {
    let mut sections = Vec::with_capacity(4);

    let brief_json = serde_json::to_string_pretty(current).unwrap_or_else(|_| "{}".to_string());
    sections.push(format!("<current_brief>\n{brief_json}\n</current_brief>"));

    if !history.is_empty() {
        sections.push(format!(
            "<recent_conversation>\n{}\n</recent_conversation>",
            conversation_summary(history)
        ));
    }

    if let Some(notes) = research.map(str::trim).filter(|n| !n.is_empty()) {
        sections.push(format!("<research_notes>\n{notes}\n</research_notes>"));
    }

    sections.push(format!("<user_message>\n{user_message}\n</user_message>"));
    sections.join("\n\n")
}
