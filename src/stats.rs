//! Aggregate statistics over the cycle log.

use jiff::Timestamp;
use serde::Serialize;

use crate::model::CycleResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub cycles_completed: usize,
    pub total_runtime_seconds: f64,
    pub total_tasks_generated: usize,
    pub total_tasks_published: usize,
    pub total_patterns_detected: usize,

    /// Zero when no cycle has completed.
    pub average_cycle_seconds: f64,

    pub last_cycle_start: Option<Timestamp>,
}

impl CycleStats {
    pub fn from_cycles(cycles: &[CycleResult]) -> Self {
        let total_runtime_seconds: f64 = cycles.iter().map(|c| c.duration_seconds).sum();
        let average_cycle_seconds = if cycles.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let count = cycles.len() as f64;
            total_runtime_seconds / count
        };

        Self {
            cycles_completed: cycles.len(),
            total_runtime_seconds,
            total_tasks_generated: cycles.iter().map(|c| c.tasks_generated).sum(),
            total_tasks_published: cycles.iter().map(|c| c.tasks_published).sum(),
            total_patterns_detected: cycles.iter().map(|c| c.learning_report.patterns_detected).sum(),
            average_cycle_seconds,
            last_cycle_start: cycles.iter().map(|c| c.cycle_start).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{CycleStatus, LearningReport};

    fn cycle(number: u64, start_secs: i64, duration: f64, tasks: usize, patterns: usize) -> CycleResult {
        let start = Timestamp::from_second(start_secs).unwrap();
        CycleResult {
            cycle_number: number,
            cycle_start: start,
            duration_seconds: duration,
            learning_report: LearningReport {
                generated_at: start,
                new_items: 0,
                queued: 0,
                patterns_detected: patterns,
                top_themes: vec![],
                recommendations: vec![],
            },
            tasks_generated: tasks,
            tasks_published: tasks,
            ready_tasks_found: 0,
            selected: None,
            claimed: false,
            status: CycleStatus::Completed,
        }
    }

    #[test]
    fn empty_log() {
        let stats = CycleStats::from_cycles(&[]);
        assert_eq!(stats, CycleStats::default());
    }

    #[test]
    fn aggregates() {
        let cycles = vec![
            cycle(1, 1_000, 2.0, 3, 1),
            cycle(2, 9_000, 4.0, 1, 0),
            cycle(3, 5_000, 6.0, 0, 2),
        ];

        let stats = CycleStats::from_cycles(&cycles);

        assert_eq!(stats.cycles_completed, 3);
        assert!((stats.total_runtime_seconds - 12.0).abs() < f64::EPSILON);
        assert!((stats.average_cycle_seconds - 4.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_tasks_generated, 4);
        assert_eq!(stats.total_tasks_published, 4);
        assert_eq!(stats.total_patterns_detected, 3);
        assert_eq!(stats.last_cycle_start, Some(Timestamp::from_second(9_000).unwrap()));
    }
}
