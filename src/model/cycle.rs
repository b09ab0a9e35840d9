//! Learning reports and the durable per-cycle record.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Summary of one cycle's learning queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningReport {
    pub generated_at: Timestamp,

    /// Items that survived dedup this cycle.
    pub new_items: usize,

    /// Entries (items and patterns) that scored above zero.
    pub queued: usize,

    pub patterns_detected: usize,

    /// At most five themes, most frequent first.
    pub top_themes: Vec<String>,

    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleStatus {
    Completed,
}

impl CycleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

/// The work item a cycle picked as the best next task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedWork {
    pub number: u64,
    pub title: String,
    pub score: u32,
}

/// Immutable record of one completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleResult {
    pub cycle_number: u64,
    pub cycle_start: Timestamp,
    pub duration_seconds: f64,
    pub learning_report: LearningReport,
    pub tasks_generated: usize,
    pub tasks_published: usize,
    pub ready_tasks_found: usize,
    pub selected: Option<SelectedWork>,

    /// Whether the selected work item was claimed this cycle.
    #[serde(default)]
    pub claimed: bool,

    pub status: CycleStatus,
}
