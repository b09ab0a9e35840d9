//! Learning report: the summary one cycle hands to task generation.

use jiff::Timestamp;

use crate::{
    model::{Entry, LearningReport},
    patterns::extract_themes,
    prioritize::Scored,
    vocabulary::Vocabulary,
};

/// How many themes a report lists.
pub const TOP_THEMES: usize = 5;

/// Summarises a prioritized queue.
///
/// `new_items` is the number of items that survived dedup; the queue may
/// be shorter (zero-score items are dropped) or longer (patterns).
pub fn build_report(
    new_items: usize,
    queue: &[Scored],
    patterns_detected: usize,
    vocab: &Vocabulary,
    generated_at: Timestamp,
) -> LearningReport {
    LearningReport {
        generated_at,
        new_items,
        queued: queue.len(),
        patterns_detected,
        top_themes: top_themes(queue, vocab),
        recommendations: recommendations(queue, patterns_detected),
    }
}

/// Most frequent themes across the queue's items, at most [`TOP_THEMES`].
///
/// Patterns are not counted; their members already are. Ties keep the
/// order in which the theme was first met walking the queue.
pub fn top_themes(queue: &[Scored], vocab: &Vocabulary) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for scored in queue {
        let Entry::Item(item) = &scored.entry else {
            continue;
        };
        for theme in extract_themes(&item.text(), vocab) {
            match counts.iter_mut().find(|(t, _)| *t == theme) {
                Some((_, n)) => *n += 1,
                None => counts.push((theme, 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(TOP_THEMES)
        .map(|(theme, _)| theme)
        .collect()
}

/// Fixed follow-up suggestions triggered by what the queue contains.
fn recommendations(queue: &[Scored], patterns_detected: usize) -> Vec<String> {
    let texts: Vec<String> = queue.iter().map(|s| s.entry.text().to_lowercase()).collect();
    let mentions = |word: &str| texts.iter().any(|t| t.contains(word));

    let mut out = Vec::new();
    if mentions("governance") {
        out.push("Deep dive into AI governance frameworks".to_string());
    }
    if mentions("distributed") {
        out.push("Explore distributed AI architectures".to_string());
    }
    if patterns_detected > 0 {
        out.push(format!(
            "Investigate {patterns_detected} cross-domain patterns"
        ));
    }
    out
}
