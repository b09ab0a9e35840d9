//! Fixed keyword vocabularies.
//!
//! Every keyword set the engine matches against lives here as a named
//! constant. [`Vocabulary`] bundles them so a deployment can swap sets
//! from config and tests can build their own.

use serde::Deserialize;

/// Controlled theme vocabulary, in extraction order.
pub const THEMES: &[&str] = &[
    "ai",
    "machine learning",
    "autonomous",
    "distributed",
    "blockchain",
    "governance",
    "democracy",
    "ethics",
    "embedding",
    "parallel",
    "quantum",
    "biology",
];

/// Phrases worth +5 when present.
pub const MISSION_CRITICAL: &[&str] = &["ai autonomy", "ai collaboration", "ai governance"];

/// Phrases worth +3 when present.
pub const MID_PRIORITY: &[&str] = &["distributed", "democratic", "open source"];

/// Terms worth +1 when present.
pub const GENERAL_INTEREST: &[&str] = &["ai", "machine learning", "llm"];

/// Themes that earn a dedicated learning task.
pub const ACTIONABLE_THEMES: &[&str] = &["ai", "autonomous", "governance"];

/// The actionable theme whose learning task is raised to high priority.
pub const HIGHEST_VALUE_THEME: &str = "autonomous";

/// A discovered repository is kept only if its name or description
/// contains one of these.
pub const REPO_RELEVANCE_TERMS: &[&str] = &["ai", "ml", "auto", "agent", "learn"];

pub const MISSION_CRITICAL_WEIGHT: u32 = 5;
pub const MID_PRIORITY_WEIGHT: u32 = 3;
pub const GENERAL_INTEREST_WEIGHT: u32 = 1;

/// Flat bonus for a pattern, independent of its text.
pub const PATTERN_BONUS: u32 = 2;

/// The keyword sets one engine instance matches against.
///
/// All entries are expected lower-case; matching lower-cases the text,
/// not the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Vocabulary {
    pub themes: Vec<String>,
    pub mission_critical: Vec<String>,
    pub mid_priority: Vec<String>,
    pub general_interest: Vec<String>,
    pub actionable_themes: Vec<String>,
    pub highest_value_theme: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            themes: owned(THEMES),
            mission_critical: owned(MISSION_CRITICAL),
            mid_priority: owned(MID_PRIORITY),
            general_interest: owned(GENERAL_INTEREST),
            actionable_themes: owned(ACTIONABLE_THEMES),
            highest_value_theme: HIGHEST_VALUE_THEME.to_string(),
        }
    }
}

impl Vocabulary {
    pub fn is_actionable(&self, theme: &str) -> bool {
        self.actionable_themes.iter().any(|t| t == theme)
    }
}

/// True if `text` (already lower-cased) contains any of `phrases`.
pub fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_str()))
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
