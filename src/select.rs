//! Work-item selection: parse requirements out of free-text bodies and
//! pick the single best ready item.
//!
//! Greedy and single-pass. Items arrive already filtered to the ready
//! label, so nothing in progress or blocked is ever considered, and
//! dependencies count only as "has any or not".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{TaskRequirements, WorkItem};

// Markdown emphasis between a label and its value is skipped, so
// `**Type:** research` reads the same as `Type: research`.
static TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Type:[*_]*\s*(\w+)").expect("valid regex"));
static PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Priority:[*_]*\s*(\w+)").expect("valid regex"));

// A heading owns its whole line: `Dependencies:`, `## Dependencies`,
// `**Dependencies:**`. Prefixed forms such as `Task Dependencies:` need the colon.
static DEPENDENCIES_RE: Lazy<Regex> = Lazy::new(|| heading_regex("dependencies"));
static CRITERIA_RE: Lazy<Regex> = Lazy::new(|| heading_regex("success criteria"));

const DEFAULT_TYPE: &str = "general";
const DEFAULT_PRIORITY: &str = "medium";

fn heading_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)^\s*(?:#+\s*)?[*_]*(?:(?:\w+\s+)+{name}[*_]*:|{name}[*_]*:?)[*_]*\s*$"
    ))
    .expect("valid regex")
}

/// A ready work item with its parsed requirements and selection score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<'a> {
    pub item: &'a WorkItem,
    pub requirements: TaskRequirements,
    pub score: u32,
}

/// Parses the structured fields of a work-item body.
///
/// Never fails: anything missing falls back to its default (`general`,
/// `medium`, empty lists). A priority word outside high/medium/low is kept
/// as written and weighs like low.
pub fn parse_task_requirements(body: &str) -> TaskRequirements {
    let kind = TYPE_RE
        .captures(body)
        .map_or_else(|| DEFAULT_TYPE.to_string(), |c| c[1].to_lowercase());

    let priority = PRIORITY_RE
        .captures(body)
        .map_or_else(|| DEFAULT_PRIORITY.to_string(), |c| c[1].to_lowercase());

    TaskRequirements {
        kind,
        priority,
        dependencies: bullet_block(body, &DEPENDENCIES_RE),
        success_criteria: bullet_block(body, &CRITERIA_RE),
    }
}

/// The contiguous bullet lines after the first line matching `heading`.
///
/// Blank lines between the heading and the first bullet are allowed; the
/// run ends at the first line that is not a bullet.
fn bullet_block(body: &str, heading: &Regex) -> Vec<String> {
    let mut lines = body.lines().skip_while(|line| !heading.is_match(line));
    if lines.next().is_none() {
        return Vec::new();
    }
    lines
        .skip_while(|line| line.trim().is_empty())
        .map_while(bullet_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Text of a `-` or `*` bullet line with markers and whitespace stripped.
fn bullet_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if !trimmed.starts_with(['-', '*']) {
        return None;
    }
    Some(trimmed.trim_start_matches(['-', '*']).trim().to_string())
}

/// Selection weight of a parsed priority word: high 3, medium 2, anything
/// else 1.
pub fn priority_weight(priority: &str) -> u32 {
    match priority {
        "high" => 3,
        "medium" => 2,
        _ => 1,
    }
}

/// Priority weight, plus 2 when nothing blocks it, plus 1 when it says
/// what done looks like.
pub fn score(requirements: &TaskRequirements) -> u32 {
    let mut score = priority_weight(&requirements.priority);
    if requirements.dependencies.is_empty() {
        score += 2;
    }
    if !requirements.success_criteria.is_empty() {
        score += 1;
    }
    score
}

/// Every item with its score, best first. Ties keep input order.
pub fn rank_work_items(items: &[WorkItem]) -> Vec<Ranked<'_>> {
    let mut ranked: Vec<Ranked<'_>> = items
        .iter()
        .map(|item| {
            let requirements = parse_task_requirements(&item.body);
            Ranked {
                item,
                score: score(&requirements),
                requirements,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// The best item to work on next, or `None` for an empty list.
pub fn select_best_task(items: &[WorkItem]) -> Option<&WorkItem> {
    rank_work_items(items).into_iter().next().map(|r| r.item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(number: u64, body: &str) -> WorkItem {
        WorkItem {
            number,
            title: format!("Task {number}"),
            body: body.to_string(),
            labels: vec!["ready-for-work".into()],
            assignees: vec![],
        }
    }

    #[test]
    fn parses_priority_and_blocks() {
        let body = "Type: Research\n\
                    Priority: High\n\
                    \n\
                    Dependencies:\n\
                    - #12 lands first\n\
                    * schema review\n\
                    \n\
                    Success Criteria:\n\
                    - tests pass\n";

        let req = parse_task_requirements(body);

        assert_eq!(req.kind, "research");
        assert_eq!(req.priority, "high");
        assert_eq!(req.dependencies, vec!["#12 lands first", "schema review"]);
        assert_eq!(req.success_criteria, vec!["tests pass"]);
    }

    #[test]
    fn empty_body_defaults() {
        let req = parse_task_requirements("");
        assert_eq!(req.kind, "general");
        assert_eq!(req.priority, "medium");
        assert!(req.dependencies.is_empty());
        assert!(req.success_criteria.is_empty());
    }

    #[test]
    fn unknown_priority_word_is_kept() {
        let req = parse_task_requirements("priority: Urgent");
        assert_eq!(req.priority, "urgent");
        assert_eq!(score(&req), 3);
    }

    #[test]
    fn unknown_priority_loses_to_medium() {
        let items = vec![work(1, "Priority: urgent"), work(2, "Priority: medium")];

        let scores: Vec<(u64, u32)> = rank_work_items(&items)
            .iter()
            .map(|r| (r.item.number, r.score))
            .collect();
        assert_eq!(scores, vec![(2, 4), (1, 3)]);
        assert_eq!(select_best_task(&items).unwrap().number, 2);
    }

    #[test]
    fn priority_weights() {
        assert_eq!(priority_weight("high"), 3);
        assert_eq!(priority_weight("medium"), 2);
        assert_eq!(priority_weight("low"), 1);
        assert_eq!(priority_weight("p1"), 1);
    }

    #[test]
    fn prefixed_heading_opens_block() {
        let req = parse_task_requirements(
            "Task Dependencies:\n- #4 merged\n\nKey Success Criteria:\n- benchmarks green\n",
        );
        assert_eq!(req.dependencies, vec!["#4 merged"]);
        assert_eq!(req.success_criteria, vec!["benchmarks green"]);
    }

    #[test]
    fn prose_mentioning_dependencies_is_not_a_heading() {
        let req = parse_task_requirements("There are no dependencies\n- stray bullet");
        assert!(req.dependencies.is_empty());
    }

    #[test]
    fn heading_without_bullets_is_empty() {
        let req = parse_task_requirements("Dependencies:\nnone at all\n- not part of it");
        assert!(req.dependencies.is_empty());
    }

    #[test]
    fn inline_label_is_not_a_heading() {
        let req = parse_task_requirements("Dependencies: none\n- stray bullet");
        assert!(req.dependencies.is_empty());
    }

    #[test]
    fn bullets_stop_at_first_non_bullet() {
        let req =
            parse_task_requirements("## Success Criteria\n- one\n-   two  \nprose\n- three");
        assert_eq!(req.success_criteria, vec!["one", "two"]);
    }

    #[test]
    fn empty_bullets_are_dropped() {
        let req = parse_task_requirements("Dependencies:\n-\n- real\n");
        assert_eq!(req.dependencies, vec!["real"]);
    }

    #[test]
    fn scores_combine() {
        let high_free_defined = parse_task_requirements("Priority: high\nSuccess Criteria:\n- x");
        assert_eq!(score(&high_free_defined), 6);

        let low_blocked = parse_task_requirements("Priority: low\nDependencies:\n- y");
        assert_eq!(score(&low_blocked), 1);
    }

    #[test]
    fn selects_highest_score() {
        let items = vec![
            work(1, "Priority: low"),
            work(2, "Priority: high\nSuccess Criteria:\n- done"),
            work(3, "Priority: medium"),
        ];
        assert_eq!(select_best_task(&items).unwrap().number, 2);
    }

    #[test]
    fn ties_go_to_first_in_input() {
        let a = work(10, "Priority: high");
        let b = work(20, "Priority: HIGH");

        let forward = vec![a.clone(), b.clone()];
        let backward = vec![b, a];

        assert_eq!(select_best_task(&forward).unwrap().number, 10);
        assert_eq!(select_best_task(&backward).unwrap().number, 20);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_best_task(&[]).is_none());
    }

    #[test]
    fn rank_keeps_every_item() {
        let items = vec![work(1, ""), work(2, "Priority: high")];
        let ranked = rank_work_items(&items);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].item.number, 2);
        assert_eq!(ranked[0].score, 5);
        assert_eq!(ranked[1].score, 4);
    }
}
