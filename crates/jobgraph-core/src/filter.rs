//! Status / group / free-text job filters.

use crate::job::{Job, JobStatus};
use indexmap::IndexSet;

/// Every populated criterion must match. An empty filter matches every job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub group: Option<String>,
    pub search: Option<String>,
}

impl JobFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.group.is_none()
            && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = &self.status {
            if &job.status != status {
                return false;
            }
        }
        if let Some(group) = &self.group {
            if &job.group_name != group {
                return false;
            }
        }
        let query = self.search.as_deref().map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return true;
        }
        job.command
            .to_lowercase()
            .contains(&query.to_lowercase())
            || job.id.to_string().contains(query)
    }

    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter().filter(|j| self.matches(j)).cloned().collect()
    }
}

/// Distinct statuses in first-seen order, for filter pickers.
pub fn distinct_statuses(jobs: &[Job]) -> Vec<JobStatus> {
    jobs.iter()
        .map(|j| j.status.clone())
        .filter(|s| !s.as_str().is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty group names in first-seen order.
pub fn distinct_groups(jobs: &[Job]) -> Vec<String> {
    jobs.iter()
        .map(|j| j.group_name.as_str())
        .filter(|g| !g.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
