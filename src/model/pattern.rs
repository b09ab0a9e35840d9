//! Patterns: a theme seen across more than one source kind in one cycle.

use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind};

/// A theme whose items span at least two distinct source kinds.
///
/// Cycle-local: folded into the cycle's report and scored as a
/// pseudo-item, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub theme: String,

    /// Distinct kinds in first-appearance order.
    pub kinds: Vec<ItemKind>,

    pub items: Vec<Item>,

    /// One-line human summary.
    pub insight: String,
}

impl Pattern {
    /// The text a pattern contributes to keyword scoring: the theme, then
    /// each member's title and description in member order.
    pub fn text(&self) -> String {
        let mut text = self.theme.clone();
        for item in &self.items {
            text.push(' ');
            text.push_str(&item.text());
        }
        text
    }
}
