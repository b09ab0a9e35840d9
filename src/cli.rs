//! CLI interface for Lookout.
//!
//! Each subcommand is non-interactive: arguments in, structured output out.
//! JSON and tables go to stdout; progress and logs go to stderr.
//!
//! - `lookout cycle` / `lookout run` drive the learning loop.
//! - `lookout cycles` / `lookout stats` read the cycle log.
//! - `lookout queue` works the tracker's ready items by hand.
//! - `lookout parse` shows how a work-item body is read.

mod cycles;
mod format;
mod queue;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    config::Config,
    identity::{gh_config_dir, resolve_identity},
    storage::Storage,
    tracker::GitHubTracker,
};

use cycles::CyclesCommand;
use queue::QueueCommand;

/// Lookout: a self-directed research loop over GitHub and arXiv.
#[derive(Debug, Parser)]
#[command(name = "lookout", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// State directory. Defaults to `~/.lookout/state`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Identity whose `gh` config is used (`~/.lookout/gh-config/<identity>`).
    /// Falls back to `LOOKOUT_IDENTITY`, then `identity` in config.
    #[arg(long = "as", global = true)]
    identity: Option<String>,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow:
  1. lookout cycle                     run one cycle, print its record
  2. lookout queue list                ready work, best first
  3. lookout queue claim 42
  4. lookout queue complete 42 --summary "Wrote up findings in #57"

Continuous:
  lookout run --interval-minutes 120
  touch ~/.lookout/state/stop          stop after the current cycle"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one learning cycle and print its record as JSON.
    Cycle,

    /// Run cycles continuously until stopped.
    ///
    /// A failed cycle is logged and retried after five minutes. Create a
    /// `stop` file in the state directory to end the loop between cycles.
    Run {
        /// Minutes between completed cycles. Defaults to config.
        #[arg(long)]
        interval_minutes: Option<u64>,

        /// Stop after this many cycles.
        #[arg(long)]
        max_cycles: Option<u64>,
    },

    /// Inspect recorded cycles.
    Cycles {
        #[command(subcommand)]
        command: CyclesCommand,
    },

    /// Aggregate statistics over every recorded cycle.
    Stats,

    /// Work the tracker's queue: list, claim, complete, block.
    Queue {
        #[command(subcommand)]
        command: QueueCommand,
    },

    /// Parse a work-item body and print its requirements as JSON.
    Parse {
        /// File to read. Reads stdin when omitted.
        file: Option<PathBuf>,
    },
}

/// Runs a command. Everything except `parse` reads the config file first.
pub fn run(cli: Cli) -> Result<(), String> {
    let Cli {
        root,
        identity,
        command,
        ..
    } = cli;
    let identity = identity.as_deref();

    match command {
        Command::Cycle => {
            let config = Config::load()?;
            let storage = open_storage(root)?;
            let gh_config = resolve_gh_config(&config, identity)?;
            let tracker = github_tracker(&config, gh_config.clone());
            cycles::cmd_cycle(&config, storage, gh_config.as_deref(), &tracker)
        }
        Command::Run {
            interval_minutes,
            max_cycles,
        } => {
            let config = Config::load()?;
            let storage = open_storage(root)?;
            let gh_config = resolve_gh_config(&config, identity)?;
            let tracker = github_tracker(&config, gh_config.clone());
            let schedule = cycles::schedule(
                interval_minutes.unwrap_or(config.cycle_interval_minutes),
                max_cycles,
            );
            cycles::cmd_run(&config, storage, gh_config.as_deref(), &tracker, schedule)
        }
        Command::Cycles { command } => {
            let storage = open_storage(root)?;
            match command {
                CyclesCommand::List => cycles::cmd_list(&storage),
                CyclesCommand::Show { number } => cycles::cmd_show(&storage, number),
            }
        }
        Command::Stats => cycles::cmd_stats(&open_storage(root)?),
        Command::Queue { command } => {
            let config = Config::load()?;
            let tracker = github_tracker(&config, resolve_gh_config(&config, identity)?);
            queue::run(&config, &tracker, command)
        }
        Command::Parse { file } => queue::cmd_parse(file.as_deref()),
    }
}

fn open_storage(root: Option<PathBuf>) -> Result<Storage, String> {
    let root = match root {
        Some(root) => root,
        None => Storage::default_root().ok_or("could not determine home directory")?,
    };
    Storage::new(&root).map_err(|e| format!("failed to open state at {}: {e}", root.display()))
}

/// `GH_CONFIG_DIR` for the resolved identity; `None` uses the ambient `gh` login.
fn resolve_gh_config(config: &Config, explicit: Option<&str>) -> Result<Option<PathBuf>, String> {
    resolve_identity(explicit, config.identity.as_deref())
        .map(|identity| gh_config_dir(&identity))
        .transpose()
}

fn github_tracker(config: &Config, gh_config: Option<PathBuf>) -> GitHubTracker {
    GitHubTracker {
        repo: config.repo.clone(),
        gh_config,
        labels: config.labels.clone(),
        publish_labels: config.publish_labels.clone(),
    }
}
