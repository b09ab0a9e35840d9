//! Work queue: the lifecycle transitions this process may drive.
//!
//! A queue only finishes what it claimed itself. Completing or blocking
//! someone else's item is refused before the tracker is touched.

use tracing::info;

use crate::tracker::WorkTracker;

pub struct WorkQueue<'a> {
    tracker: &'a dyn WorkTracker,
    claimed: Option<u64>,
}

impl<'a> WorkQueue<'a> {
    pub fn new(tracker: &'a dyn WorkTracker) -> Self {
        Self {
            tracker,
            claimed: None,
        }
    }

    /// A queue that already owns `number`, e.g. claimed by an earlier
    /// cycle and recorded in its result.
    pub fn resume(tracker: &'a dyn WorkTracker, number: u64) -> Self {
        Self {
            tracker,
            claimed: Some(number),
        }
    }

    #[cfg(test)]
    pub fn claimed(&self) -> Option<u64> {
        self.claimed
    }

    /// Claims a ready item. At most one item is held at a time.
    pub fn claim(&mut self, number: u64) -> Result<(), String> {
        if let Some(held) = self.claimed {
            return Err(format!("already working on #{held}"));
        }
        self.tracker.claim(number)?;
        self.claimed = Some(number);
        info!(number, "work item claimed");
        Ok(())
    }

    pub fn complete(&mut self, number: u64, summary: &str) -> Result<(), String> {
        self.ensure_owned(number)?;
        self.tracker.complete(number, summary)?;
        self.claimed = None;
        info!(number, "work item completed");
        Ok(())
    }

    pub fn mark_blocked(&mut self, number: u64, reason: &str) -> Result<(), String> {
        self.ensure_owned(number)?;
        self.tracker.mark_blocked(number, reason)?;
        self.claimed = None;
        info!(number, "work item blocked");
        Ok(())
    }

    pub fn update_progress(&self, number: u64, progress: &str) -> Result<(), String> {
        self.ensure_owned(number)?;
        self.tracker.update_progress(number, progress)
    }

    fn ensure_owned(&self, number: u64) -> Result<(), String> {
        if self.claimed == Some(number) {
            Ok(())
        } else {
            Err(format!("#{number} was not claimed by this queue"))
        }
    }
}
