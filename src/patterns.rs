//! Pattern detection: themes that show up across source kinds.
//!
//! Runs over the fresh items of one cycle only. Items seen in earlier
//! cycles were already removed by dedup and never contribute.

use std::collections::HashMap;

use crate::{
    model::{Item, ItemKind, Pattern},
    vocabulary::Vocabulary,
};

/// Themes whose phrase occurs in `text`, in vocabulary order.
///
/// Plain case-insensitive substring containment, so `ai` also matches
/// inside longer words.
pub fn extract_themes(text: &str, vocab: &Vocabulary) -> Vec<String> {
    let text = text.to_lowercase();
    vocab
        .themes
        .iter()
        .filter(|theme| text.contains(theme.as_str()))
        .cloned()
        .collect()
}

/// Emits one pattern per theme whose items number at least two and span
/// at least two distinct kinds.
///
/// Patterns come out in the order their theme was first seen in `items`.
pub fn detect_patterns(items: &[Item], vocab: &Vocabulary) -> Vec<Pattern> {
    let mut groups: Vec<(String, Vec<&Item>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        for theme in extract_themes(&item.text(), vocab) {
            let slot = *index.entry(theme.clone()).or_insert_with(|| {
                groups.push((theme, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(item);
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .filter_map(|(theme, members)| {
            let kinds = distinct_kinds(&members);
            if kinds.len() < 2 {
                return None;
            }
            let insight = format!(
                "Theme '{theme}' appearing across {}",
                kinds
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Some(Pattern {
                theme,
                kinds,
                items: members.into_iter().cloned().collect(),
                insight,
            })
        })
        .collect()
}

fn distinct_kinds(members: &[&Item]) -> Vec<ItemKind> {
    let mut kinds = Vec::new();
    for item in members {
        let kind = item.kind();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}
