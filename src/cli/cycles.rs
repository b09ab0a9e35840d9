//! Cycle commands: run one, run continuously, read the log.

use std::path::Path;
use std::time::Duration;

use clap::Subcommand;

use crate::{
    config::Config,
    discover::default_sources,
    orchestrator::{CycleSettings, Orchestrator, Schedule, SleepPacer, StopFile},
    stats::CycleStats,
    storage::{Storage, StorageError},
    tracker::WorkTracker,
};

use super::format::{format_cycle_line, format_stats};

#[derive(Debug, Subcommand)]
pub enum CyclesCommand {
    /// List recorded cycles, oldest first.
    List,

    /// Print one cycle's full record as JSON.
    Show {
        /// Cycle number.
        number: u64,
    },
}

pub(super) fn schedule(interval_minutes: u64, max_cycles: Option<u64>) -> Schedule {
    Schedule {
        interval: Duration::from_secs(interval_minutes * 60),
        max_cycles,
    }
}

fn orchestrator<'a>(
    config: &Config,
    storage: Storage,
    gh_config: Option<&Path>,
    tracker: &'a dyn WorkTracker,
) -> Orchestrator<'a> {
    Orchestrator::new(
        storage,
        default_sources(&config.discovery, gh_config),
        tracker,
        config.vocabulary.clone(),
        CycleSettings::from_config(config),
    )
}

/// Single-cycle mode: a cycle that fails takes the process down with it.
pub(super) fn cmd_cycle(
    config: &Config,
    storage: Storage,
    gh_config: Option<&Path>,
    tracker: &dyn WorkTracker,
) -> Result<(), String> {
    let result = orchestrator(config, storage, gh_config, tracker).run_one_cycle();

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| format!("failed to serialize cycle: {e}"))?;
    println!("{json}");
    Ok(())
}

pub(super) fn cmd_run(
    config: &Config,
    storage: Storage,
    gh_config: Option<&Path>,
    tracker: &dyn WorkTracker,
    schedule: Schedule,
) -> Result<(), String> {
    let stop = StopFile::new(storage.stop_path());
    let mut orch = orchestrator(config, storage, gh_config, tracker);
    let first = orch.next_cycle();

    let summary = orch.run_continuous(schedule, &mut SleepPacer, &stop);

    if summary.attempted() == 0 {
        eprintln!("Stopped before cycle #{first}");
    } else {
        eprintln!(
            "Stopped after {} cycles, #{first} to #{} ({} completed, {} failed)",
            summary.attempted(),
            orch.next_cycle() - 1,
            summary.completed,
            summary.failed
        );
    }
    Ok(())
}

pub(super) fn cmd_list(storage: &Storage) -> Result<(), String> {
    let cycles = storage
        .list_cycles()
        .map_err(|e| format!("failed to list cycles: {e}"))?;

    if cycles.is_empty() {
        println!("No cycles");
        return Ok(());
    }

    for cycle in &cycles {
        println!("{}", format_cycle_line(cycle));
    }
    Ok(())
}

pub(super) fn cmd_show(storage: &Storage, number: u64) -> Result<(), String> {
    let cycle = storage.load_cycle(number).map_err(|e| match e {
        StorageError::CycleNotFound(n) => format!("no cycle #{n}"),
        e => format!("failed to load cycle #{number}: {e}"),
    })?;

    let json = serde_json::to_string_pretty(&cycle)
        .map_err(|e| format!("failed to serialize cycle: {e}"))?;
    println!("{json}");
    Ok(())
}

pub(super) fn cmd_stats(storage: &Storage) -> Result<(), String> {
    let cycles = storage
        .list_cycles()
        .map_err(|e| format!("failed to list cycles: {e}"))?;

    for line in format_stats(&CycleStats::from_cycles(&cycles)) {
        println!("{line}");
    }
    Ok(())
}
