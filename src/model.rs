//! Core data model for Lookout.
//!
//! Discovered items and the patterns found across them, the task proposals
//! a cycle generates, the work items it reads from the tracker, and the
//! record each completed cycle leaves behind.

mod cycle;
mod item;
mod pattern;
mod task;
mod work_item;

pub use cycle::{CycleResult, CycleStatus, LearningReport, SelectedWork};
pub use item::{Item, ItemKind};
pub use pattern::Pattern;
pub use task::{Priority, TaskKind, TaskProposal};
pub use work_item::{TaskRequirements, WorkItem};

/// One scored entry in the learning queue: a raw item or a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Item(Item),
    Pattern(Pattern),
}

impl Entry {
    /// The text keyword matching runs over.
    pub fn text(&self) -> String {
        match self {
            Self::Item(item) => item.text(),
            Self::Pattern(pattern) => pattern.text(),
        }
    }
}
