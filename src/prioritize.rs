//! Learning-queue prioritization.
//!
//! Scores items and patterns by fixed relevance phrases, drops anything
//! scoring zero, and orders the rest by score. The sort is stable:
//! equal scores keep discovery order, which keeps top-theme reporting
//! reproducible.

use crate::{
    model::Entry,
    vocabulary::{
        GENERAL_INTEREST_WEIGHT, MID_PRIORITY_WEIGHT, MISSION_CRITICAL_WEIGHT, PATTERN_BONUS,
        Vocabulary, contains_any,
    },
};

/// A queue entry with its score. Scores in a queue are always ≥ 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub score: u32,
    pub entry: Entry,
}

/// Relevance score of a single entry.
///
/// Each rule is checked independently and the weights add up.
pub fn score(entry: &Entry, vocab: &Vocabulary) -> u32 {
    let text = entry.text().to_lowercase();
    let mut score = 0;

    if contains_any(&text, &vocab.mission_critical) {
        score += MISSION_CRITICAL_WEIGHT;
    }
    if contains_any(&text, &vocab.mid_priority) {
        score += MID_PRIORITY_WEIGHT;
    }
    if contains_any(&text, &vocab.general_interest) {
        score += GENERAL_INTEREST_WEIGHT;
    }
    if matches!(entry, Entry::Pattern(_)) {
        score += PATTERN_BONUS;
    }

    score
}

/// Scores every entry, drops zeros, and sorts descending (stable).
pub fn prioritize(entries: Vec<Entry>, vocab: &Vocabulary) -> Vec<Scored> {
    let mut queue: Vec<Scored> = entries
        .into_iter()
        .map(|entry| Scored {
            score: score(&entry, vocab),
            entry,
        })
        .filter(|s| s.score > 0)
        .collect();

    // `sort_by` is stable.
    queue.sort_by(|a, b| b.score.cmp(&a.score));
    queue
}
