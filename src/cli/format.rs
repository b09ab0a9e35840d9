//! Output formatting for CLI display.

use crate::{model::CycleResult, select::Ranked, stats::CycleStats};

/// One line per cycle for `cycles list`.
pub(super) fn format_cycle_line(cycle: &CycleResult) -> String {
    let selected = cycle
        .selected
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| format!("#{}", s.number));
    let claimed = if cycle.claimed { " (claimed)" } else { "" };
    format!(
        "#{:<4} {}  {:>6.1}s  new {:<3} patterns {:<2} tasks {}/{}  ready {:<3} next {selected}{claimed}",
        cycle.cycle_number,
        cycle.cycle_start.strftime("%Y-%m-%d %H:%M"),
        cycle.duration_seconds,
        cycle.learning_report.new_items,
        cycle.learning_report.patterns_detected,
        cycle.tasks_published,
        cycle.tasks_generated,
        cycle.ready_tasks_found,
    )
}

/// One line per ranked work item for `queue list` and `queue next`.
pub(super) fn format_ranked_line(ranked: &Ranked<'_>) -> String {
    format!(
        "#{:<5} score {}  [{}] {}",
        ranked.item.number, ranked.score, ranked.requirements.priority, ranked.item.title
    )
}

pub(super) fn format_stats(stats: &CycleStats) -> Vec<String> {
    let last = stats
        .last_cycle_start
        .map_or_else(|| "never".to_string(), |t| t.to_string());
    vec![
        format!("Cycles completed:   {}", stats.cycles_completed),
        format!("Total runtime:      {:.1}s", stats.total_runtime_seconds),
        format!("Average cycle:      {:.1}s", stats.average_cycle_seconds),
        format!(
            "Tasks generated:    {} ({} published)",
            stats.total_tasks_generated, stats.total_tasks_published
        ),
        format!("Patterns detected:  {}", stats.total_patterns_detected),
        format!("Last cycle started: {last}"),
    ]
}
