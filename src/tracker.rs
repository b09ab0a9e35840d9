//! The external work-tracking system: where tasks are published and
//! ready work is picked up.

mod github;

use crate::model::{TaskProposal, WorkItem};

pub use github::GitHubTracker;

/// Operations the engine needs from a work tracker.
///
/// Implementations report failures as `Err` and never panic.
pub trait WorkTracker {
    /// Open items carrying `label`, at most `limit`. Empty on failure.
    fn list_ready_work(&self, label: &str, limit: usize) -> Vec<WorkItem>;

    /// Publishes a proposal as a new work item and returns its number.
    fn publish_task(&self, task: &TaskProposal) -> Result<u64, String>;

    /// Assign to self, move ready → in progress, leave a claim comment.
    fn claim(&self, number: u64) -> Result<(), String>;

    /// Move in progress → completed, post the summary, close.
    fn complete(&self, number: u64, summary: &str) -> Result<(), String>;

    /// Move in progress → blocked and post the reason.
    fn mark_blocked(&self, number: u64, reason: &str) -> Result<(), String>;

    fn add_comment(&self, number: u64, text: &str) -> Result<(), String>;

    /// Current labels of one item, open or closed.
    fn labels_of(&self, number: u64) -> Result<Vec<String>, String>;

    /// Posts a progress note without changing state.
    fn update_progress(&self, number: u64, progress: &str) -> Result<(), String> {
        self.add_comment(number, &format!("Progress update:\n\n{progress}"))
    }
}
