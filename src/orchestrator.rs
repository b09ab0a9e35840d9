//! The learning cycle: discover, dedupe, detect, prioritize, report,
//! generate, publish, select, persist.
//!
//! One [`Orchestrator`] owns the dedup store and is the only writer of the
//! state directory. Cycles never overlap. A cycle either returns its
//! [`CycleResult`] or fails outright by panicking; nothing in between is
//! recorded. Continuous mode survives failed cycles by backing off.

use std::{
    any::Any,
    fs, io,
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use jiff::Timestamp;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    dedup::DedupStore,
    discover::{Discover, discover_all},
    model::{CycleResult, CycleStatus, Entry, SelectedWork, TaskProposal, WorkItem},
    patterns::detect_patterns,
    prioritize::prioritize,
    queue::WorkQueue,
    report::build_report,
    select::rank_work_items,
    storage::Storage,
    tasks::{generate_tasks, is_publishable},
    tracker::WorkTracker,
    vocabulary::Vocabulary,
};

/// Pause after a failed cycle before trying again.
pub const FAILURE_BACKOFF: Duration = Duration::from_secs(5 * 60);

/// Per-cycle knobs taken from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSettings {
    pub ready_label: String,
    pub ready_limit: usize,
    pub auto_claim: bool,
}

impl CycleSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ready_label: config.labels.ready.clone(),
            ready_limit: config.ready_limit,
            auto_claim: config.auto_claim,
        }
    }
}

/// How continuous mode paces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Pause after a completed cycle.
    pub interval: Duration,

    /// Stop after this many cycles, failed ones included.
    pub max_cycles: Option<u64>,
}

/// What a continuous run did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub completed: u64,
    pub failed: u64,
}

impl RunSummary {
    pub fn attempted(&self) -> u64 {
        self.completed + self.failed
    }
}

/// Waits between cycles.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, duration: Duration) {
        info!(minutes = duration.as_secs() / 60, "sleeping until next cycle");
        thread::sleep(duration);
    }
}

/// Polled between cycles; `true` ends continuous mode.
pub trait StopSignal {
    fn should_stop(&self) -> bool;
}

/// A stop request expressed as a file. Consumed when seen.
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StopSignal for StopFile {
    fn should_stop(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not consume stop file");
                true
            }
        }
    }
}

pub struct Orchestrator<'a> {
    sources: Vec<Box<dyn Discover>>,
    tracker: &'a dyn WorkTracker,
    dedup: DedupStore,
    storage: Storage,
    vocab: Vocabulary,
    settings: CycleSettings,
    next_cycle: u64,
}

impl<'a> Orchestrator<'a> {
    /// Loads the dedup store and picks up numbering where the cycle log
    /// left off.
    pub fn new(
        storage: Storage,
        sources: Vec<Box<dyn Discover>>,
        tracker: &'a dyn WorkTracker,
        vocab: Vocabulary,
        settings: CycleSettings,
    ) -> Self {
        let dedup = DedupStore::load(storage.seen_path());
        let next_cycle = match storage.last_cycle_number() {
            Ok(last) => last.map_or(1, |n| n + 1),
            Err(e) => {
                error!(error = %e, "cycle log unreadable, numbering from 1");
                1
            }
        };
        if dedup.is_empty() {
            info!(next_cycle, "no items seen yet, everything discovered counts as new");
        } else {
            info!(next_cycle, seen = dedup.len(), "resuming");
        }
        Self {
            sources,
            tracker,
            dedup,
            storage,
            vocab,
            settings,
            next_cycle,
        }
    }

    /// Number the next cycle will get.
    pub fn next_cycle(&self) -> u64 {
        self.next_cycle
    }

    /// Runs exactly one cycle.
    ///
    /// External failures along the way are logged and absorbed. The number
    /// is consumed up front, so a cycle that panics still leaves a gap-free
    /// sequence for the ones after it.
    pub fn run_one_cycle(&mut self) -> CycleResult {
        let number = self.next_cycle;
        self.next_cycle += 1;

        let cycle_start = Timestamp::now();
        let clock = Instant::now();
        info!(cycle = number, "cycle started");

        let discovered = discover_all(&self.sources);
        let discovered_count = discovered.len();
        let fresh = self.dedup.filter_new(discovered);
        info!(cycle = number, discovered = discovered_count, fresh = fresh.len(), "discovery finished");

        let patterns = detect_patterns(&fresh, &self.vocab);
        let patterns_detected = patterns.len();
        let entries: Vec<Entry> = fresh
            .iter()
            .cloned()
            .map(Entry::Item)
            .chain(patterns.into_iter().map(Entry::Pattern))
            .collect();
        let queue = prioritize(entries, &self.vocab);

        let report = build_report(fresh.len(), &queue, patterns_detected, &self.vocab, Timestamp::now());
        info!(
            cycle = number,
            queued = report.queued,
            patterns = patterns_detected,
            themes = ?report.top_themes,
            "learning report built"
        );

        let tasks = generate_tasks(report.patterns_detected, &report.top_themes, &self.vocab);
        let tasks_published = self.publish(number, &tasks);

        let ready = self
            .tracker
            .list_ready_work(&self.settings.ready_label, self.settings.ready_limit);
        let selected = select(&ready);
        let claimed = match &selected {
            Some(work) if self.settings.auto_claim => self.claim(number, work.number),
            _ => false,
        };
        if let Some(work) = &selected {
            info!(cycle = number, number = work.number, score = work.score, claimed, "work selected");
        }

        for item in &fresh {
            self.dedup.mark_seen(item.id.clone());
        }
        if let Err(e) = self.dedup.persist() {
            error!(cycle = number, error = %e, "failed to persist dedup store");
        }

        let result = CycleResult {
            cycle_number: number,
            cycle_start,
            duration_seconds: clock.elapsed().as_secs_f64(),
            learning_report: report,
            tasks_generated: tasks.len(),
            tasks_published,
            ready_tasks_found: ready.len(),
            selected,
            claimed,
            status: CycleStatus::Completed,
        };

        if let Err(e) = self.storage.append_cycle(&result) {
            error!(cycle = number, error = %e, "failed to record cycle");
        }

        info!(
            cycle = number,
            duration_seconds = result.duration_seconds,
            tasks = result.tasks_generated,
            published = tasks_published,
            ready = result.ready_tasks_found,
            "cycle completed"
        );
        result
    }

    /// Runs cycles until the stop signal fires or `max_cycles` is reached.
    ///
    /// A panicking cycle is logged and followed by [`FAILURE_BACKOFF`]
    /// instead of the regular interval. No pause follows the last cycle.
    pub fn run_continuous(
        &mut self,
        schedule: Schedule,
        pacer: &mut dyn Pacer,
        stop: &dyn StopSignal,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(
            first_cycle = self.next_cycle,
            interval_minutes = schedule.interval.as_secs() / 60,
            max_cycles = ?schedule.max_cycles,
            "continuous mode started"
        );

        loop {
            if stop.should_stop() {
                info!("stop requested");
                break;
            }

            let number = self.next_cycle;
            let pause = match panic::catch_unwind(AssertUnwindSafe(|| self.run_one_cycle())) {
                Ok(_) => {
                    summary.completed += 1;
                    schedule.interval
                }
                Err(payload) => {
                    summary.failed += 1;
                    error!(
                        cycle = number,
                        error = %panic_message(payload.as_ref()),
                        backoff_minutes = FAILURE_BACKOFF.as_secs() / 60,
                        "cycle failed"
                    );
                    FAILURE_BACKOFF
                }
            };

            if schedule.max_cycles.is_some_and(|max| summary.attempted() >= max) {
                break;
            }
            if stop.should_stop() {
                info!("stop requested");
                break;
            }
            pacer.pause(pause);
        }

        info!(completed = summary.completed, failed = summary.failed, "continuous mode finished");
        summary
    }

    /// Publishes the proposals worth publishing; returns how many made it.
    fn publish(&self, number: u64, tasks: &[TaskProposal]) -> usize {
        let mut published = 0;
        for task in tasks.iter().filter(|t| is_publishable(t)) {
            match self.tracker.publish_task(task) {
                Ok(_) => published += 1,
                Err(e) => warn!(cycle = number, title = %task.title, error = %e, "publish failed"),
            }
        }
        published
    }

    fn claim(&self, cycle: u64, number: u64) -> bool {
        let mut queue = WorkQueue::new(self.tracker);
        match queue.claim(number) {
            Ok(()) => true,
            Err(e) => {
                warn!(cycle, number, error = %e, "claim failed");
                false
            }
        }
    }
}

fn select(ready: &[WorkItem]) -> Option<SelectedWork> {
    rank_work_items(ready).into_iter().next().map(|r| SelectedWork {
        number: r.item.number,
        title: r.item.title.clone(),
        score: r.score,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
