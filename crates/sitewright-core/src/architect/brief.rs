//! Brief sanitizing, merging and completeness.
//!
//! The `Brief` struct lives in `sitewright-types`; this module provides an
//! extension trait (`BriefExt`) with the merge and completeness rules, plus
//! the sanitizer that turns the model's loosely-typed JSON into brief values.

use serde_json::{Map, Value};

use sitewright_types::brief::{Brief, BriefField};

/// Tokens the model uses to mean "I don't know". Compared case-insensitively.
const PLACEHOLDERS: [&str; 5] = ["null", "unknown", "tbd", "n/a", "undefined"];

/// Separator used when flattening list-valued extractions.
const LIST_SEPARATOR: &str = ", ";

/// Sanitize one extracted JSON value into a brief field value.
///
/// Strings are trimmed; placeholder tokens and blanks become `None`. Lists are
/// flattened in input order with `", "`, skipping empty elements. Numbers and
/// booleans are stringified, objects become compact JSON.
pub fn sanitize_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => sanitize_str(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(sanitize_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(LIST_SEPARATOR))
            }
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

fn sanitize_str(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if PLACEHOLDERS.contains(&lower.as_str()) {
        return None;
    }
    Some(trimmed.to_string())
}

/// Build a brief from the model's `brief` object. Unknown keys are ignored.
pub fn sanitize_brief(raw: &Map<String, Value>) -> Brief {
    let mut brief = Brief::default();
    for field in BriefField::ALL {
        let value = raw.get(field.as_str()).and_then(sanitize_value);
        brief.set(field, value);
    }
    brief
}

/// Extension trait for `Brief` merge and completeness rules.
pub trait BriefExt {
    /// Merge a freshly extracted brief over this one.
    ///
    /// Precedence per field: new non-null value, then existing value, then null.
    /// A populated field is never reset.
    fn merged_with(&self, update: &Brief) -> Brief;

    /// Merge for a turn that carried research notes.
    ///
    /// Research may fill empty fields freely. An already-populated field is
    /// only replaced when the new value appears in the user's own message, so
    /// scraped text cannot overwrite something the user said earlier.
    fn merged_with_research(&self, update: &Brief, user_message: &str) -> Brief;

    /// First required field still missing, in priority order.
    fn first_missing(&self) -> Option<BriefField>;

    /// Whether every required field is populated.
    fn is_complete(&self) -> bool;

    /// Fields whose value differs from `before` and is now populated.
    fn changed_since(&self, before: &Brief) -> Vec<BriefField>;
}

impl BriefExt for Brief {
    fn merged_with(&self, update: &Brief) -> Brief {
        let mut merged = self.clone();
        for field in BriefField::ALL {
            if let Some(value) = update.get(field) {
                merged.set(field, Some(value.to_string()));
            }
        }
        merged
    }

    fn merged_with_research(&self, update: &Brief, user_message: &str) -> Brief {
        let said = user_message.to_lowercase();
        let mut merged = self.clone();
        for field in BriefField::ALL {
            let Some(value) = update.get(field) else {
                continue;
            };
            let accept = match self.get(field) {
                None => true,
                Some(existing) if existing == value => true,
                Some(_) => said.contains(&value.to_lowercase()),
            };
            if accept {
                merged.set(field, Some(value.to_string()));
            } else {
                tracing::debug!(field = %field, "kept user-supplied value over research");
            }
        }
        merged
    }

    fn first_missing(&self) -> Option<BriefField> {
        BriefField::REQUIRED_PRIORITY
            .into_iter()
            .find(|field| self.get(*field).is_none())
    }

    fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    fn changed_since(&self, before: &Brief) -> Vec<BriefField> {
        BriefField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some() && self.get(*field) != before.get(*field))
            .collect()
    }
}

/// Fixed clarifying question for a missing required field.
pub fn question_for(field: BriefField) -> &'static str {
    match field {
        BriefField::Industry => "What industry is this for?",
        BriefField::Name => "What is the name of the project?",
        BriefField::Audience => "Who is the site for? Tell me about your target audience.",
        BriefField::Vibe => {
            "What look and feel are you going for? For example dark and minimal, or bright and playful."
        }
        BriefField::Sections => "Which pages should the site have (e.g. Home, Menu, Contact)?",
        BriefField::Context | BriefField::Reference => {
            "Anything else I should know about the project?"
        }
    }
}

/// Short acknowledgement of the fields captured this turn, if any.
pub fn acknowledgement(brief: &Brief, captured: &[BriefField]) -> Option<String> {
    let parts: Vec<String> = captured
        .iter()
        .filter(|field| field.is_required())
        .filter_map(|field| {
            brief
                .get(*field)
                .map(|value| format!("{}: {value}", field.label().to_lowercase()))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!("Got it ({}).", parts.join("; ")))
    }
}
