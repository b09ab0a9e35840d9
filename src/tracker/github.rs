//! GitHub issues as the work tracker, driven through `gh issue`.
//!
//! Lifecycle state lives entirely in labels; see [`Labels`].

use std::path::PathBuf;

use jiff::Timestamp;
use serde::Deserialize;
use tracing::{info, warn};

use super::WorkTracker;
use crate::{
    config::Labels,
    gh,
    model::{TaskProposal, WorkItem},
    tasks::render_issue_body,
};

#[derive(Debug, Clone)]
pub struct GitHubTracker {
    /// `owner/name`; `None` means the repository of the working directory.
    pub repo: Option<String>,
    pub gh_config: Option<PathBuf>,
    pub labels: Labels,

    /// Labels put on newly published tasks.
    pub publish_labels: Vec<String>,
}

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    assignees: Vec<GhActor>,
}

#[derive(Deserialize)]
struct GhActor {
    login: String,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Deserialize)]
struct GhIssueLabels {
    #[serde(default)]
    labels: Vec<GhLabel>,
}

impl GitHubTracker {
    fn gh(&self, args: &[&str]) -> Result<String, String> {
        let mut full: Vec<&str> = args.to_vec();
        if let Some(repo) = &self.repo {
            full.extend(["--repo", repo.as_str()]);
        }
        gh::run(&full, self.gh_config.as_deref())
    }

    fn relabel(&self, number: u64, from: &str, to: &str) -> Result<(), String> {
        let num = number.to_string();
        self.gh(&["issue", "edit", &num, "--remove-label", from, "--add-label", to])
            .map_err(|e| format!("failed to relabel #{number}: {e}"))?;
        Ok(())
    }
}

impl WorkTracker for GitHubTracker {
    fn list_ready_work(&self, label: &str, limit: usize) -> Vec<WorkItem> {
        let limit = limit.to_string();
        let json = match self.gh(&[
            "issue",
            "list",
            "--label",
            label,
            "--state",
            "open",
            "--limit",
            &limit,
            "--json",
            "number,title,body,labels,assignees",
        ]) {
            Ok(json) => json,
            Err(e) => {
                warn!(label, error = %e, "listing ready work failed");
                return Vec::new();
            }
        };

        match parse_issue_list(&json) {
            Ok(items) => items,
            Err(e) => {
                warn!(label, error = %e, "listing ready work failed");
                Vec::new()
            }
        }
    }

    fn publish_task(&self, task: &TaskProposal) -> Result<u64, String> {
        let body = render_issue_body(task, Timestamp::now());
        let mut args: Vec<&str> = vec!["issue", "create", "--title", &task.title, "--body", &body];
        for label in &self.publish_labels {
            args.extend(["--label", label.as_str()]);
        }

        let url = self
            .gh(&args)
            .map_err(|e| format!("failed to publish '{}': {e}", task.title))?;
        let number = gh::parse_issue_number(&url)?;
        info!(number, title = %task.title, "task published");
        Ok(number)
    }

    fn claim(&self, number: u64) -> Result<(), String> {
        let num = number.to_string();
        self.gh(&["issue", "edit", &num, "--add-assignee", "@me"])
            .map_err(|e| format!("failed to assign #{number}: {e}"))?;
        self.relabel(number, &self.labels.ready, &self.labels.in_progress)?;
        self.add_comment(number, "Task claimed by lookout. Starting work.")
    }

    fn complete(&self, number: u64, summary: &str) -> Result<(), String> {
        self.relabel(number, &self.labels.in_progress, &self.labels.completed)?;
        self.add_comment(
            number,
            &format!("Task completed.\n\n{summary}\n\nReady for review. Closing issue."),
        )?;
        let num = number.to_string();
        self.gh(&["issue", "close", &num])
            .map_err(|e| format!("failed to close #{number}: {e}"))?;
        Ok(())
    }

    fn mark_blocked(&self, number: u64, reason: &str) -> Result<(), String> {
        self.relabel(number, &self.labels.in_progress, &self.labels.blocked)?;
        self.add_comment(
            number,
            &format!(
                "Task blocked.\n\n{reason}\n\nNeeds human intervention or dependency resolution."
            ),
        )
    }

    fn add_comment(&self, number: u64, text: &str) -> Result<(), String> {
        let num = number.to_string();
        self.gh(&["issue", "comment", &num, "--body", text])
            .map_err(|e| format!("failed to comment on #{number}: {e}"))?;
        Ok(())
    }

    fn labels_of(&self, number: u64) -> Result<Vec<String>, String> {
        let num = number.to_string();
        let json = self
            .gh(&["issue", "view", &num, "--json", "labels"])
            .map_err(|e| format!("failed to view #{number}: {e}"))?;
        parse_issue_labels(&json)
    }
}

fn parse_issue_list(json: &str) -> Result<Vec<WorkItem>, String> {
    let issues: Vec<GhIssue> =
        serde_json::from_str(json).map_err(|e| format!("failed to parse issue list: {e}"))?;

    Ok(issues
        .into_iter()
        .map(|i| WorkItem {
            number: i.number,
            title: i.title,
            body: i.body,
            labels: i.labels.into_iter().map(|l| l.name).collect(),
            assignees: i.assignees.into_iter().map(|a| a.login).collect(),
        })
        .collect())
}

fn parse_issue_labels(json: &str) -> Result<Vec<String>, String> {
    let issue: GhIssueLabels =
        serde_json::from_str(json).map_err(|e| format!("failed to parse issue labels: {e}"))?;
    Ok(issue.labels.into_iter().map(|l| l.name).collect())
}
