//! Work items owned by the external tracker, and the view parsed out of them.

use serde::{Deserialize, Serialize};

/// An externally tracked unit of work.
///
/// Read-only from the core's side; mutations are requested through the
/// tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// Structured fields parsed from a work item's body.
///
/// Derived fresh on every read; never cached and never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequirements {
    /// Free-form task type, lower-cased. `general` when absent.
    #[serde(rename = "type")]
    pub kind: String,

    /// Priority word, lower-cased. `medium` when absent.
    pub priority: String,
    pub dependencies: Vec<String>,
    pub success_criteria: Vec<String>,
}
