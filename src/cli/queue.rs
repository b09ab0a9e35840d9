//! Queue commands: list, claim, complete, block, and body parsing.
//!
//! Completing, blocking, or reporting progress requires the item to carry
//! the in-progress label, which is how a claim shows up between separate
//! invocations.

use std::{fs, io, path::Path};

use clap::Subcommand;

use crate::{
    config::Config,
    queue::WorkQueue,
    select::{parse_task_requirements, rank_work_items, select_best_task},
    tracker::WorkTracker,
};

use super::format::format_ranked_line;

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Ready work items, best first.
    List,

    /// The single best ready item, as JSON.
    Next,

    /// Claim a ready item: assign, label in progress, comment.
    Claim {
        /// Issue number.
        number: u64,
    },

    /// Finish an in-progress item: label completed, comment, close.
    Complete {
        /// Issue number.
        number: u64,

        /// What was done.
        #[arg(long)]
        summary: String,
    },

    /// Mark an in-progress item blocked.
    Block {
        /// Issue number.
        number: u64,

        /// What it is waiting on.
        #[arg(long)]
        reason: String,
    },

    /// Post a progress note on an in-progress item.
    Progress {
        /// Issue number.
        number: u64,

        /// Progress text.
        text: String,
    },

    /// Comment on any item.
    Comment {
        /// Issue number.
        number: u64,

        /// Comment body.
        text: String,
    },
}

pub(super) fn run(
    config: &Config,
    tracker: &dyn WorkTracker,
    command: QueueCommand,
) -> Result<(), String> {
    match command {
        QueueCommand::List => cmd_list(config, tracker),
        QueueCommand::Next => cmd_next(config, tracker),
        QueueCommand::Claim { number } => {
            WorkQueue::new(tracker).claim(number)?;
            eprintln!("Claimed #{number}");
            Ok(())
        }
        QueueCommand::Complete { number, summary } => {
            resume(config, tracker, number)?.complete(number, &summary)?;
            eprintln!("Completed #{number}");
            Ok(())
        }
        QueueCommand::Block { number, reason } => {
            resume(config, tracker, number)?.mark_blocked(number, &reason)?;
            eprintln!("Blocked #{number}");
            Ok(())
        }
        QueueCommand::Progress { number, text } => {
            resume(config, tracker, number)?.update_progress(number, &text)?;
            eprintln!("Progress posted on #{number}");
            Ok(())
        }
        QueueCommand::Comment { number, text } => {
            tracker.add_comment(number, &text)?;
            eprintln!("Commented on #{number}");
            Ok(())
        }
    }
}

fn cmd_list(config: &Config, tracker: &dyn WorkTracker) -> Result<(), String> {
    let ready = tracker.list_ready_work(&config.labels.ready, config.ready_limit);
    if ready.is_empty() {
        println!("No ready work");
        return Ok(());
    }

    for ranked in rank_work_items(&ready) {
        println!("{}", format_ranked_line(&ranked));
    }
    Ok(())
}

/// Prints the best ready item as JSON, or nothing when the queue is empty.
fn cmd_next(config: &Config, tracker: &dyn WorkTracker) -> Result<(), String> {
    let ready = tracker.list_ready_work(&config.labels.ready, config.ready_limit);
    let Some(best) = select_best_task(&ready) else {
        eprintln!("No ready work");
        return Ok(());
    };

    let json = serde_json::to_string_pretty(best)
        .map_err(|e| format!("failed to serialize work item: {e}"))?;
    println!("{json}");
    Ok(())
}

/// A queue holding `number`, provided the tracker shows it in progress.
fn resume<'a>(
    config: &Config,
    tracker: &'a dyn WorkTracker,
    number: u64,
) -> Result<WorkQueue<'a>, String> {
    let labels = tracker.labels_of(number)?;
    if !labels.contains(&config.labels.in_progress) {
        return Err(format!(
            "#{number} is not labeled '{}'; claim it first",
            config.labels.in_progress
        ));
    }
    Ok(WorkQueue::resume(tracker, number))
}

pub(super) fn cmd_parse(file: Option<&Path>) -> Result<(), String> {
    let body = match file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        None => io::read_to_string(io::stdin()).map_err(|e| format!("failed to read stdin: {e}"))?,
    };

    let json = serde_json::to_string_pretty(&parse_task_requirements(&body))
        .map_err(|e| format!("failed to serialize requirements: {e}"))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{model::WorkItem, tracker::fake::FakeTracker};

    fn labeled(number: u64, label: &str) -> WorkItem {
        WorkItem {
            number,
            title: format!("Task {number}"),
            body: String::new(),
            labels: vec![label.to_string()],
            assignees: vec![],
        }
    }

    #[test]
    fn in_progress_item_resumes() {
        let config = Config::default();
        let tracker = FakeTracker::with_ready(vec![labeled(3, "in-progress")]);

        let mut queue = resume(&config, &tracker, 3).unwrap();
        queue.complete(3, "done").unwrap();

        assert_eq!(tracker.calls(), vec!["view 3", "complete 3 done"]);
    }

    #[test]
    fn unclaimed_item_is_refused() {
        let config = Config::default();
        let tracker = FakeTracker::with_ready(vec![labeled(3, "ready-for-work")]);

        let err = resume(&config, &tracker, 3).err().unwrap();
        assert!(err.contains("not labeled 'in-progress'"));
    }

    #[test]
    fn lookup_failure_is_reported_as_such() {
        let config = Config::default();
        let tracker = FakeTracker::default();

        let err = resume(&config, &tracker, 8).err().unwrap();
        assert_eq!(err, "no issue #8");
    }
}
