//! Task proposals and their priority scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-level priority of a task proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Research,
    Learning,
    Synthesis,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Learning => "learning",
            Self::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated, externally publishable unit of suggested work.
///
/// Consumed immediately by publication; never stored on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProposal {
    pub title: String,
    pub kind: TaskKind,
    pub priority: Priority,
    pub description: String,
}
