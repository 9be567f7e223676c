//! Prompt pattern models.
//!
//! A [`Pattern`] is an immutable, named prompt-engineering snippet. Built-in
//! patterns ship with the catalog; custom patterns are authored through a
//! [`PatternDraft`] and persisted by the store.
//!
//! The serialized form matches the extension's storage layout:
//!
//! ```json
//! {
//!   "id": "ritual-rabbit",
//!   "trigger": "Follow the white rabbit...",
//!   "purpose": "Marks a mode shift into high-context or metaphoric thinking",
//!   "implication": "Cognitive priming for complexity",
//!   "type": "RITUAL",
//!   "icon": "🐇",
//!   "examples": ["..."]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Glyph shown for patterns without an icon.
pub const DEFAULT_ICON: &str = "📝";

/// Id prefixes stripped from menu titles.
const TITLE_PREFIXES: [&str; 2] = ["ritual-", "pat-"];

/// Variant of a prompt pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    /// A ritual phrase that shifts the model's working mode.
    Ritual,
    /// A development-oriented prompting technique.
    DevPattern,
    /// A combination of several patterns.
    Combination,
}

impl PatternType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ritual => "RITUAL",
            Self::DevPattern => "DEV_PATTERN",
            Self::Combination => "COMBINATION",
        }
    }

    /// Parses a type name, accepting wire names and kebab/snake case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ritual" => Some(Self::Ritual),
            "dev_pattern" | "devpattern" | "dev" => Some(Self::DevPattern),
            "combination" | "combo" => Some(Self::Combination),
            _ => None,
        }
    }

    /// Returns all pattern types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Ritual, Self::DevPattern, Self::Combination]
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type filter used by the popup listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Every pattern type.
    #[default]
    All,
    /// Only the given type.
    Only(PatternType),
}

impl TypeFilter {
    /// Returns true if the pattern passes the filter.
    #[must_use]
    pub fn accepts(self, pattern: &Pattern) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => pattern.pattern_type == kind,
        }
    }
}

/// A prompt pattern record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique, stable identifier.
    pub id: String,
    /// Literal text inserted into the target field.
    pub trigger: String,
    /// Human-readable rationale.
    pub purpose: String,
    /// Secondary annotation.
    #[serde(default)]
    pub implication: String,
    /// Pattern variant.
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Optional short glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Illustrative usages, possibly empty.
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Pattern {
    /// Creates a pattern with the required fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        trigger: impl Into<String>,
        purpose: impl Into<String>,
        pattern_type: PatternType,
    ) -> Self {
        Self {
            id: id.into(),
            trigger: trigger.into(),
            purpose: purpose.into(),
            implication: String::new(),
            pattern_type,
            icon: None,
            description: None,
            examples: Vec::new(),
        }
    }

    /// Sets the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the implication.
    #[must_use]
    pub fn with_implication(mut self, implication: impl Into<String>) -> Self {
        self.implication = implication.into();
        self
    }

    /// Sets the examples.
    #[must_use]
    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    /// Case-insensitive containment test against `trigger`, `purpose` and `id`.
    ///
    /// `needle` must already be lower-cased. An empty needle matches everything.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.trigger.to_lowercase().contains(needle)
            || self.purpose.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }

    /// Returns the icon, or [`DEFAULT_ICON`] when none is set.
    #[must_use]
    pub fn display_icon(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_ICON)
    }

    /// Returns the id without its `ritual-`/`pat-` prefix.
    #[must_use]
    pub fn short_name(&self) -> &str {
        TITLE_PREFIXES
            .iter()
            .find_map(|prefix| self.id.strip_prefix(prefix))
            .unwrap_or(&self.id)
    }
}

/// User-authored input for a custom pattern.
///
/// Drafts come from the options page or the CLI and are validated before
/// they reach the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDraft {
    /// Explicit id; generated when absent or blank.
    #[serde(default)]
    pub id: Option<String>,
    /// Trigger text (required).
    #[serde(default)]
    pub trigger: String,
    /// Purpose (required).
    #[serde(default)]
    pub purpose: String,
    /// Implication.
    #[serde(default)]
    pub implication: String,
    /// Pattern type; defaults to `DEV_PATTERN`.
    #[serde(default, rename = "type")]
    pub pattern_type: Option<PatternType>,
    /// Icon glyph.
    #[serde(default)]
    pub icon: Option<String>,
    /// Examples; blank entries are dropped.
    #[serde(default)]
    pub examples: Vec<String>,
}

impl PatternDraft {
    /// Validates the draft and turns it into a [`Pattern`].
    ///
    /// `now_millis` seeds the generated `custom-<millis>` id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the trigger or purpose is blank.
    pub fn into_pattern(self, now_millis: u128) -> Result<Pattern> {
        if self.trigger.trim().is_empty() || self.purpose.trim().is_empty() {
            return Err(Error::InvalidInput(
                "trigger and purpose are required".to_string(),
            ));
        }

        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("custom-{now_millis}"));

        Ok(Pattern {
            id,
            trigger: self.trigger,
            purpose: self.purpose,
            implication: self.implication,
            pattern_type: self.pattern_type.unwrap_or(PatternType::DevPattern),
            icon: self.icon.filter(|icon| !icon.trim().is_empty()),
            description: None,
            examples: self
                .examples
                .into_iter()
                .filter(|example| !example.trim().is_empty())
                .collect(),
        })
    }
}

impl From<Pattern> for PatternDraft {
    fn from(pattern: Pattern) -> Self {
        Self {
            id: Some(pattern.id),
            trigger: pattern.trigger,
            purpose: pattern.purpose,
            implication: pattern.implication,
            pattern_type: Some(pattern.pattern_type),
            icon: pattern.icon,
            examples: pattern.examples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rabbit() -> Pattern {
        Pattern::new(
            "ritual-rabbit",
            "Follow the white rabbit...",
            "Marks a mode shift",
            PatternType::Ritual,
        )
        .with_icon("🐇")
    }

    #[test]
    fn test_pattern_type_wire_names() {
        let json = serde_json::to_string(&PatternType::DevPattern).unwrap();
        assert_eq!(json, "\"DEV_PATTERN\"");
        let parsed: PatternType = serde_json::from_str("\"COMBINATION\"").unwrap();
        assert_eq!(parsed, PatternType::Combination);
    }

    #[test]
    fn test_pattern_type_parse() {
        assert_eq!(PatternType::parse("ritual"), Some(PatternType::Ritual));
        assert_eq!(PatternType::parse("dev-pattern"), Some(PatternType::DevPattern));
        assert_eq!(PatternType::parse("DEV_PATTERN"), Some(PatternType::DevPattern));
        assert_eq!(PatternType::parse("Combination"), Some(PatternType::Combination));
        assert_eq!(PatternType::parse("unknown"), None);
    }

    #[test]
    fn test_matches_is_case_insensitive_over_fields() {
        let pattern = rabbit();
        assert!(pattern.matches("rabbit"));
        assert!(pattern.matches("mode shift"));
        assert!(pattern.matches("ritual-"));
        assert!(pattern.matches(""));
        assert!(!pattern.matches("RABBIT"), "needle must be pre-lowered");
        assert!(!pattern.matches("turtle"));
    }

    #[test]
    fn test_short_name_strips_known_prefixes() {
        assert_eq!(rabbit().short_name(), "rabbit");
        let pat = Pattern::new("pat-anchor", "t", "p", PatternType::DevPattern);
        assert_eq!(pat.short_name(), "anchor");
        let rule = Pattern::new("rule-length", "t", "p", PatternType::DevPattern);
        assert_eq!(rule.short_name(), "rule-length");
    }

    #[test]
    fn test_display_icon_fallback() {
        assert_eq!(rabbit().display_icon(), "🐇");
        let plain = Pattern::new("x", "t", "p", PatternType::Ritual);
        assert_eq!(plain.display_icon(), DEFAULT_ICON);
    }

    #[test]
    fn test_pattern_json_layout() {
        let json = serde_json::to_value(rabbit()).unwrap();
        assert_eq!(json["type"], "RITUAL");
        assert_eq!(json["icon"], "🐇");
        assert!(json.get("description").is_none());

        let parsed: Pattern = serde_json::from_str(
            r#"{"id":"a","trigger":"b","purpose":"c","type":"RITUAL"}"#,
        )
        .unwrap();
        assert!(parsed.examples.is_empty());
        assert!(parsed.implication.is_empty());
    }

    #[test]
    fn test_draft_requires_trigger_and_purpose() {
        let draft = PatternDraft {
            trigger: "Do the thing".to_string(),
            ..Default::default()
        };
        let err = draft.into_pattern(1).unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_draft_generates_id_and_drops_blank_examples() {
        let draft = PatternDraft {
            id: Some("  ".to_string()),
            trigger: "Think twice".to_string(),
            purpose: "Slows the model down".to_string(),
            examples: vec!["one".to_string(), "   ".to_string()],
            ..Default::default()
        };
        let pattern = draft.into_pattern(1_700_000_000_000).unwrap();
        assert_eq!(pattern.id, "custom-1700000000000");
        assert_eq!(pattern.examples, vec!["one".to_string()]);
        assert_eq!(pattern.pattern_type, PatternType::DevPattern);
    }

    #[test]
    fn test_type_filter() {
        assert!(TypeFilter::All.accepts(&rabbit()));
        assert!(TypeFilter::Only(PatternType::Ritual).accepts(&rabbit()));
        assert!(!TypeFilter::Only(PatternType::DevPattern).accepts(&rabbit()));
    }
}
