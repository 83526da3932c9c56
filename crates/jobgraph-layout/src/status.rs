//! Aggregate status of a job group.
//!
//! One priority rule is used everywhere a group is summarised: FAILED (including CANCELLED)
//! if any member failed, else RUNNING if any member runs, else PENDING if any member waits,
//! else COMPLETED if every member completed, else MIXED.

use jobgraph_core::{Job, JobStatus};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupStatus {
    Failed,
    Running,
    Pending,
    Completed,
    Mixed,
}

impl GroupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "FAILED",
            Self::Running => "RUNNING",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Mixed => "MIXED",
        }
    }

    /// Legend color, shared with the per-job palette.
    pub fn color(self) -> &'static str {
        match self {
            Self::Failed => JobStatus::Failed.color(),
            Self::Running => JobStatus::Running.color(),
            Self::Pending => JobStatus::Pending.color(),
            Self::Completed => JobStatus::Completed.color(),
            Self::Mixed => JobStatus::default().color(),
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn group_status(members: &[Job]) -> GroupStatus {
    let any = |pred: fn(&JobStatus) -> bool| members.iter().any(|j| pred(&j.status));
    if any(JobStatus::is_failure) {
        GroupStatus::Failed
    } else if any(|s| *s == JobStatus::Running) {
        GroupStatus::Running
    } else if any(|s| *s == JobStatus::Pending) {
        GroupStatus::Pending
    } else if !members.is_empty() && members.iter().all(|j| j.status == JobStatus::Completed) {
        GroupStatus::Completed
    } else {
        GroupStatus::Mixed
    }
}

/// Percentage of completed members, 0 for an empty slice.
pub fn group_progress(members: &[Job]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let done = members
        .iter()
        .filter(|j| j.status == JobStatus::Completed)
        .count();
    done as f64 / members.len() as f64 * 100.0
}
