use jobgraph_core::{Job, JobStatus};
use jobgraph_layout::{DependencyGraph, dependency_chain};
use std::collections::BTreeSet;

fn job(id: u64, deps: &[&str]) -> Job {
    Job::new(id, JobStatus::Pending).with_depends_on(deps.iter().copied())
}

fn set(ids: &[u64]) -> BTreeSet<u64> {
    ids.iter().copied().collect()
}

fn queue() -> Vec<Job> {
    vec![
        job(1, &[]),
        job(2, &["1"]),
        job(3, &["1"]),
        job(4, &["2", "3"]),
        job(10, &[]),
        job(11, &["404"]),
        job(12, &["404"]),
    ]
}

#[test]
fn chain_walks_ancestors_descendants_and_their_relatives() {
    let jobs = queue();
    assert_eq!(dependency_chain(&jobs, 2), set(&[1, 2, 3, 4]));
    assert_eq!(dependency_chain(&jobs, 4), set(&[1, 2, 3, 4]));
    assert_eq!(dependency_chain(&jobs, 10), set(&[10]));
}

#[test]
fn chain_membership_is_symmetric() {
    let jobs = queue();
    let graph = DependencyGraph::build(jobs.clone());
    for a in &jobs {
        let from_a = graph.chain(a.id);
        assert!(from_a.contains(&a.id));
        for b in &jobs {
            assert_eq!(
                from_a.contains(&b.id),
                graph.chain(b.id).contains(&a.id),
                "chain({}) vs chain({})",
                a.id,
                b.id
            );
        }
    }
}

#[test]
fn chain_connects_through_missing_dependencies_without_reporting_them() {
    let jobs = queue();
    assert_eq!(dependency_chain(&jobs, 11), set(&[11, 12]));
}

#[test]
fn chain_terminates_on_cycles() {
    let jobs = vec![job(1, &["3"]), job(2, &["1"]), job(3, &["2"]), job(4, &[])];
    assert_eq!(dependency_chain(&jobs, 2), set(&[1, 2, 3]));
}

#[test]
fn chain_of_an_unknown_job_is_just_that_job() {
    assert_eq!(dependency_chain(&queue(), 999), set(&[999]));
    assert_eq!(dependency_chain(&[], 7), set(&[7]));
}
