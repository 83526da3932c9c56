//! Dependency-graph engine for a job queue dashboard.
//!
//! Jobs sharing the exact same parents and children are collapsed into one group, groups are
//! ranked by topological depth, and each level is laid out as a vertical column. Everything is
//! recomputed from the job list; the only state carried between recomputations is the
//! caller-owned [`ViewState`].

pub use jobgraph_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod chain;
pub mod config;
pub mod export;
pub mod group;
pub mod level;
pub mod position;
pub mod status;
pub mod view;

pub use chain::dependency_chain;
pub use config::LayoutConfig;
pub use export::{to_mermaid, to_text_listing};
pub use group::{GraphEdge, GroupId, Grouping, JobGroup, Signature, group_jobs};
pub use level::assign_levels;
pub use position::{GraphLayout, LayoutNode, NodeKind, Point, job_node_id, layout};
pub use status::{GroupStatus, group_status};
pub use view::{GroupState, ViewState};

use jobgraph_core::{Job, JobFilter, JobId, JobSnapshot};
use std::collections::BTreeSet;

/// Grouped and leveled view of one job list.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    jobs: Vec<Job>,
    grouping: Grouping,
    job_graph: graphlib::Graph<(), ()>,
}

impl DependencyGraph {
    pub fn build(jobs: Vec<Job>) -> Self {
        let mut grouping = group_jobs(&jobs);
        assign_levels(&mut grouping);
        let job_graph = chain::job_graph(&jobs);
        Self {
            jobs,
            grouping,
            job_graph,
        }
    }

    /// Builds from the jobs of `snapshot` that pass `filter`.
    pub fn from_snapshot(snapshot: &JobSnapshot, filter: &JobFilter) -> Self {
        if filter.is_empty() {
            return Self::build(snapshot.jobs.clone());
        }
        let jobs = filter.apply(&snapshot.jobs);
        tracing::debug!(
            kept = jobs.len(),
            total = snapshot.jobs.len(),
            "filtered job snapshot"
        );
        Self::build(jobs)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    /// Groups ordered by their smallest member id.
    pub fn groups(&self) -> &[JobGroup] {
        &self.grouping.groups
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.grouping.edges
    }

    pub fn group_of(&self, job_id: JobId) -> Option<&JobGroup> {
        self.grouping.group_of(job_id)
    }

    pub fn layout(&self, view: &ViewState, config: &LayoutConfig) -> GraphLayout {
        layout(&self.grouping, view, config)
    }

    /// Jobs connected to `job_id` through dependencies in either direction.
    pub fn chain(&self, job_id: JobId) -> BTreeSet<JobId> {
        chain::chain_in(&self.job_graph, &self.jobs, job_id)
    }

    /// Group-level dependency cycles, including groups that depend on themselves.
    pub fn cycles(&self) -> Vec<Vec<GroupId>> {
        let cycles: Vec<Vec<GroupId>> = graphlib::alg::find_cycles(self.grouping.graph())
            .into_iter()
            .map(|cycle| cycle.iter().map(|id| GroupId::from(id.as_str())).collect())
            .collect();
        if !cycles.is_empty() {
            tracing::warn!(cycles = cycles.len(), "job groups form dependency cycles");
        }
        cycles
    }

    /// Per job, the dependency ids that name no listed job. Jobs without any are skipped.
    pub fn inactive_dependencies(&self) -> Vec<(JobId, Vec<String>)> {
        let present: BTreeSet<String> = self.jobs.iter().map(Job::key).collect();
        self.jobs
            .iter()
            .filter_map(|job| {
                let missing = job.inactive_dependencies(&present);
                (!missing.is_empty())
                    .then(|| (job.id, missing.into_iter().map(str::to_string).collect()))
            })
            .collect()
    }

    pub fn to_mermaid(&self) -> String {
        to_mermaid(&self.jobs)
    }
}
