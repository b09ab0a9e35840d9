//! Task generation: turning a learning report into task proposals.
//!
//! Three fixed rules, applied in order. The output order is part of the
//! contract so task lists are reproducible.

use jiff::Timestamp;

use crate::{
    model::{Priority, TaskKind, TaskProposal},
    vocabulary::Vocabulary,
};

/// How many of the top themes may earn a learning task.
const LEARNING_THEMES: usize = 2;

/// Checklist attached to every published task.
const SUCCESS_CRITERIA: &[&str] = &[
    "Research completed and documented",
    "Key insights identified and recorded",
    "Connections to existing work mapped",
    "Findings shared via blog post or discussion",
];

/// Generates task proposals from a report's pattern count and top themes.
///
/// 1. Any patterns: one medium research task naming every top theme.
/// 2. Each of the first two top themes that is actionable: one learning
///    task, high for the highest-value theme, medium otherwise.
/// 3. Two or more top themes: one high synthesis task over the first two.
pub fn generate_tasks(
    patterns_detected: usize,
    top_themes: &[String],
    vocab: &Vocabulary,
) -> Vec<TaskProposal> {
    let mut tasks = Vec::new();

    if patterns_detected > 0 {
        tasks.push(TaskProposal {
            title: format!("Analyze {patterns_detected} cross-domain patterns"),
            kind: TaskKind::Research,
            priority: Priority::Medium,
            description: format!(
                "Investigate patterns detected in learning cycle: {}",
                top_themes.join(", ")
            ),
        });
    }

    for theme in top_themes.iter().take(LEARNING_THEMES) {
        if !vocab.is_actionable(theme) {
            continue;
        }
        let priority = if *theme == vocab.highest_value_theme {
            Priority::High
        } else {
            Priority::Medium
        };
        tasks.push(TaskProposal {
            title: format!("Deep dive into {theme} developments"),
            kind: TaskKind::Learning,
            priority,
            description: format!(
                "Research recent developments in {theme} based on monitoring insights"
            ),
        });
    }

    if let [first, second, ..] = top_themes {
        tasks.push(TaskProposal {
            title: format!("Synthesize insights across {first} and {second}"),
            kind: TaskKind::Synthesis,
            priority: Priority::High,
            description: format!(
                "Integrate learnings from {first} and {second} to identify novel connections"
            ),
        });
    }

    tasks
}

/// Only high and medium proposals are worth publishing.
pub fn is_publishable(task: &TaskProposal) -> bool {
    matches!(task.priority, Priority::High | Priority::Medium)
}

/// Renders the structured issue body a task is published with.
///
/// The `Type:` and `Priority:` labels and the success-criteria checklist
/// are laid out so the work-item parser reads them back.
pub fn render_issue_body(task: &TaskProposal, generated_at: Timestamp) -> String {
    let criteria: String = SUCCESS_CRITERIA
        .iter()
        .map(|c| format!("- [ ] {c}\n"))
        .collect();
    format!(
        "**Type:** {kind}\n\
         **Priority:** {priority}\n\
         \n\
         ## Description\n\
         {description}\n\
         \n\
         ## Success Criteria\n\
         {criteria}\n\
         ## Context\n\
         Auto-generated from autonomous learning cycle at {generated_at}\n",
        kind = task.kind,
        priority = task.priority,
        description = task.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::select::parse_task_requirements;

    fn themes(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn autonomous_and_governance_with_patterns() {
        let vocab = Vocabulary::default();
        let tasks = generate_tasks(2, &themes(&["autonomous", "governance"]), &vocab);

        let shape: Vec<(TaskKind, Priority)> =
            tasks.iter().map(|t| (t.kind, t.priority)).collect();
        assert_eq!(
            shape,
            vec![
                (TaskKind::Research, Priority::Medium),
                (TaskKind::Learning, Priority::High),
                (TaskKind::Learning, Priority::Medium),
                (TaskKind::Synthesis, Priority::High),
            ]
        );
        assert_eq!(tasks[0].title, "Analyze 2 cross-domain patterns");
        assert!(tasks[0].description.ends_with("autonomous, governance"));
        assert_eq!(tasks[1].title, "Deep dive into autonomous developments");
        assert_eq!(tasks[2].title, "Deep dive into governance developments");
        assert_eq!(
            tasks[3].title,
            "Synthesize insights across autonomous and governance"
        );
    }

    #[test]
    fn nothing_in_nothing_out() {
        let vocab = Vocabulary::default();
        assert!(generate_tasks(0, &[], &vocab).is_empty());
    }

    #[test]
    fn only_first_two_themes_earn_learning_tasks() {
        let vocab = Vocabulary::default();
        let tasks = generate_tasks(0, &themes(&["quantum", "biology", "ai"]), &vocab);

        // "ai" is actionable but third, so only the synthesis task fires.
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind, TaskKind::Synthesis);
    }

    #[test]
    fn single_actionable_theme() {
        let vocab = Vocabulary::default();
        let tasks = generate_tasks(0, &themes(&["ai"]), &vocab);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind, TaskKind::Learning);
        assert_eq!(tasks[0].priority, Priority::Medium);
    }

    #[test]
    fn low_priority_is_not_publishable() {
        let mut task = generate_tasks(0, &themes(&["ai"]), &Vocabulary::default()).remove(0);
        assert!(is_publishable(&task));
        task.priority = Priority::Low;
        assert!(!is_publishable(&task));
    }

    #[test]
    fn rendered_body_parses_back() {
        let vocab = Vocabulary::default();
        let task = generate_tasks(0, &themes(&["autonomous"]), &vocab).remove(0);

        let body = render_issue_body(&task, Timestamp::UNIX_EPOCH);
        let req = parse_task_requirements(&body);

        assert_eq!(req.kind, "learning");
        assert_eq!(req.priority, "high");
        assert!(req.dependencies.is_empty());
        assert_eq!(req.success_criteria.len(), 4);
        assert_eq!(req.success_criteria[0], "[ ] Research completed and documented");
    }
}
