//! Dependency chain of a focused job.
//!
//! The chain is every job connected to the focus through dependency edges followed in either
//! direction, so siblings sharing an ancestor and co-parents sharing a descendant belong to it
//! as well. Dependency ids that name no listed job still connect the jobs that wait on them;
//! they are traversed but never reported.

use crate::graphlib::{Graph, alg};
use jobgraph_core::{Job, JobId};
use std::collections::{BTreeMap, BTreeSet};

/// Job-level dependency graph with one `dep -> job` edge per declared dependency.
pub fn job_graph(jobs: &[Job]) -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::new();
    for job in jobs {
        g.ensure_node(job.key());
    }
    for job in jobs {
        let key = job.key();
        for dep in &job.depends_on {
            g.set_edge(dep.as_str(), key.as_str());
        }
    }
    g
}

/// Ids of the listed jobs connected to `focus`, including `focus` itself.
pub fn dependency_chain(jobs: &[Job], focus: JobId) -> BTreeSet<JobId> {
    chain_in(&job_graph(jobs), jobs, focus)
}

/// Same as [`dependency_chain`] over a graph built once with [`job_graph`].
pub fn chain_in(graph: &Graph<(), ()>, jobs: &[Job], focus: JobId) -> BTreeSet<JobId> {
    let present: BTreeMap<String, JobId> = jobs.iter().map(|j| (j.key(), j.id)).collect();
    let mut chain: BTreeSet<JobId> = alg::reachable_undirected(graph, &focus.to_string())
        .iter()
        .filter_map(|key| present.get(key).copied())
        .collect();
    chain.insert(focus);
    tracing::debug!(focus, size = chain.len(), "computed dependency chain");
    chain
}
