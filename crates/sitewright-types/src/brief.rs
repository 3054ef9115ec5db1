//! Project brief types.
//!
//! A `Brief` is the structured requirement record the architect conversation
//! converges on. Every field is nullable: the conversation fills them in over
//! several turns, and a populated field is only ever replaced by a freshly
//! extracted value, never reset to `None`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured requirement record extracted from the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Brief {
    /// Business or project name.
    #[serde(default)]
    pub name: Option<String>,
    /// Niche or category of the business (e.g. "Coffee shop").
    #[serde(default)]
    pub industry: Option<String>,
    /// Target customers the copy should speak to.
    #[serde(default)]
    pub audience: Option<String>,
    /// Design aesthetic (e.g. "Dark, minimal").
    #[serde(default)]
    pub vibe: Option<String>,
    /// Pages requested, comma separated (e.g. "Home, Menu, Contact").
    #[serde(default)]
    pub sections: Option<String>,
    /// Concrete facts to weave into the copy (founding year, products, ...).
    #[serde(default)]
    pub context: Option<String>,
    /// Reference website and what to borrow from it.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Names a single field of a [`Brief`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BriefField {
    Name,
    Industry,
    Audience,
    Vibe,
    Sections,
    Context,
    Reference,
}

impl BriefField {
    /// All fields in declaration order.
    pub const ALL: [BriefField; 7] = [
        BriefField::Name,
        BriefField::Industry,
        BriefField::Audience,
        BriefField::Vibe,
        BriefField::Sections,
        BriefField::Context,
        BriefField::Reference,
    ];

    /// Required fields, in the order the architect asks for them.
    pub const REQUIRED_PRIORITY: [BriefField; 5] = [
        BriefField::Industry,
        BriefField::Name,
        BriefField::Audience,
        BriefField::Vibe,
        BriefField::Sections,
    ];

    /// The JSON key of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BriefField::Name => "name",
            BriefField::Industry => "industry",
            BriefField::Audience => "audience",
            BriefField::Vibe => "vibe",
            BriefField::Sections => "sections",
            BriefField::Context => "context",
            BriefField::Reference => "reference",
        }
    }

    /// Human-readable label, used in prompts and the CLI brief card.
    pub fn label(&self) -> &'static str {
        match self {
            BriefField::Name => "Name",
            BriefField::Industry => "Industry",
            BriefField::Audience => "Audience",
            BriefField::Vibe => "Vibe",
            BriefField::Sections => "Sections",
            BriefField::Context => "Context",
            BriefField::Reference => "Reference",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED_PRIORITY.contains(self)
    }
}

impl fmt::Display for BriefField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BriefField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(BriefField::Name),
            "industry" => Ok(BriefField::Industry),
            "audience" => Ok(BriefField::Audience),
            "vibe" => Ok(BriefField::Vibe),
            "sections" => Ok(BriefField::Sections),
            "context" => Ok(BriefField::Context),
            "reference" => Ok(BriefField::Reference),
            other => Err(format!("invalid brief field: '{other}'")),
        }
    }
}

impl Brief {
    /// Read a field by name.
    pub fn get(&self, field: BriefField) -> Option<&str> {
        let value = match field {
            BriefField::Name => &self.name,
            BriefField::Industry => &self.industry,
            BriefField::Audience => &self.audience,
            BriefField::Vibe => &self.vibe,
            BriefField::Sections => &self.sections,
            BriefField::Context => &self.context,
            BriefField::Reference => &self.reference,
        };
        value.as_deref()
    }

    /// Overwrite a field by name.
    pub fn set(&mut self, field: BriefField, value: Option<String>) {
        let slot = match field {
            BriefField::Name => &mut self.name,
            BriefField::Industry => &mut self.industry,
            BriefField::Audience => &mut self.audience,
            BriefField::Vibe => &mut self.vibe,
            BriefField::Sections => &mut self.sections,
            BriefField::Context => &mut self.context,
            BriefField::Reference => &mut self.reference,
        };
        *slot = value;
    }

    /// Fields that currently hold a value, in declaration order.
    pub fn populated_fields(&self) -> Vec<BriefField> {
        BriefField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
            .collect()
    }
}

/// Who said a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ChatRole::User),
            // The original web client labels assistant turns "model"/"ai".
            "assistant" | "model" | "ai" => Ok(ChatRole::Assistant),
            other => Err(format!("invalid chat role: '{other}'")),
        }
    }
}

/// One entry of the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Outcome of one architect turn.
///
/// `is_complete` is computed from the brief contents alone; the model has no
/// way to set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub brief: Brief,
    pub reply: String,
    pub is_complete: bool,
}
