//! Per-status job counts.

use crate::job::{Job, JobStatus};
use serde::{Deserialize, Serialize};

/// Mirrors the `stats` object the scheduler tool reports next to its job list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusCounts {
    pub completed: usize,
    pub running: usize,
    pub pending: usize,
    pub blocked: usize,
    pub cancelled: usize,
    pub timeout: usize,
    pub failed: usize,
    pub unknown: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn from_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut counts = Self::default();
        for job in jobs {
            counts.record(&job.status);
        }
        counts
    }

    pub fn record(&mut self, status: &JobStatus) {
        let slot = match status {
            JobStatus::Completed => &mut self.completed,
            JobStatus::Running => &mut self.running,
            JobStatus::Pending => &mut self.pending,
            JobStatus::Blocked => &mut self.blocked,
            JobStatus::Cancelled => &mut self.cancelled,
            JobStatus::Timeout => &mut self.timeout,
            JobStatus::Failed => &mut self.failed,
            JobStatus::Unknown(_) => &mut self.unknown,
        };
        *slot += 1;
        self.total += 1;
    }

    /// Jobs that reached a terminal state, successfully or not.
    pub fn finished(&self) -> usize {
        self.completed + self.failed + self.cancelled + self.timeout
    }
}
