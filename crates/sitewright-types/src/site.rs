//! Generated site types.
//!
//! A session owns exactly one current artifact: the generated component
//! source. Generation creates it, every edit overwrites it in place.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SiteError;

/// Style label used when the caller supplies none.
pub const DEFAULT_STYLE: &str = "Modern";

/// Maximum accepted length of a session identifier.
const MAX_SESSION_ID_LEN: usize = 128;

/// Opaque identifier scoping one user's current generated artifact.
///
/// Restricted to ASCII alphanumerics, `-` and `_` so it can safely name a
/// directory on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a caller-supplied identifier.
    pub fn parse(raw: &str) -> Result<Self, SiteError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(SiteError::InvalidSessionId(raw.to_string()))
        }
    }

    /// Generate a fresh time-sortable identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// The stored output of a successful generation or edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationArtifact {
    pub session_id: SessionId,
    pub source_text: String,
}

/// Resolve the style label, falling back to [`DEFAULT_STYLE`] when absent or blank.
pub fn resolve_style(style: Option<&str>) -> &str {
    match style.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_STYLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_accepts_uuid_and_slug() {
        assert!(SessionId::parse("0191c1f2-7a3b-7c4d-8e9f-0123456789ab").is_ok());
        assert!(SessionId::parse("bean_there-01").is_ok());
    }

    #[test]
    fn test_session_id_rejects_traversal() {
        assert!(SessionId::parse("../etc").is_err());
        assert!(SessionId::parse("a/b").is_err());
        assert!(SessionId::parse("").is_err());
        assert!(SessionId::parse(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_session_id_serde_validates() {
        let ok: SessionId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(ok.as_str(), "abc-123");
        assert!(serde_json::from_str::<SessionId>("\"../../x\"").is_err());
    }

    #[test]
    fn test_generated_ids_are_valid() {
        let id = SessionId::generate();
        assert!(SessionId::parse(id.as_str()).is_ok());
    }

    #[test]
    fn test_resolve_style_defaults() {
        assert_eq!(resolve_style(None), "Modern");
        assert_eq!(resolve_style(Some("   ")), "Modern");
        assert_eq!(resolve_style(Some(" Brutalist ")), "Brutalist");
    }
}
