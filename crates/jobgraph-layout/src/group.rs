//! Grouping of jobs by dependency signature.
//!
//! Two jobs land in the same group iff they wait on exactly the same ids and are waited on by
//! exactly the same jobs. Group identity is the signature itself, so regrouping an unchanged
//! job list reproduces the same ids in the same order, whatever order the jobs arrived in.

use crate::graphlib::Graph;
use crate::status::{self, GroupStatus};
use jobgraph_core::{Job, JobId, format_range};
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Sorted, de-duplicated parent ids and derived child ids of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Signature {
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

impl Signature {
    pub fn new(
        parents: impl IntoIterator<Item = String>,
        children: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            parents: sorted_ids(parents),
            children: sorted_ids(children),
        }
    }

    /// `parents|children`, each side comma-joined. Separator characters inside ids are
    /// backslash-escaped so distinct signatures never share a key.
    pub fn key(&self) -> String {
        let join = |ids: &[String]| {
            ids.iter()
                .map(String::as_str)
                .map(escape_id)
                .collect::<Vec<_>>()
                .join(",")
        };
        format!("{}|{}", join(&self.parents), join(&self.children))
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.children.is_empty()
    }
}

fn escape_id(id: &str) -> String {
    if !id.contains([',', '|', '\\']) {
        return id.to_string();
    }
    let mut out = String::with_capacity(id.len() + 2);
    for ch in id.chars() {
        if matches!(ch, ',' | '|' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Numeric ids sort numerically and before anything else; the rest sort as strings.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn sorted_ids(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    ids.sort_by(|a, b| compare_ids(a, b));
    ids.dedup();
    ids
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobGroup {
    pub id: GroupId,
    pub signature: Signature,
    /// Ordered by job id; never empty.
    pub members: Vec<Job>,
    pub level: usize,
}

impl JobGroup {
    pub fn parent_ids(&self) -> &[String] {
        &self.signature.parents
    }

    pub fn child_ids(&self) -> &[String] {
        &self.signature.children
    }

    pub fn member_ids(&self) -> Vec<JobId> {
        self.members.iter().map(|j| j.id).collect()
    }

    pub fn min_member_id(&self) -> JobId {
        self.members.first().map(|j| j.id).unwrap_or_default()
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        self.members.iter().any(|j| j.id == job_id)
    }

    /// The first member's group name; members with other names are merged by topology.
    pub fn display_name(&self) -> &str {
        self.members
            .first()
            .map(|j| j.group_name.as_str())
            .unwrap_or_default()
    }

    /// Compact member id label, e.g. `101-104 (4)`.
    pub fn label(&self) -> String {
        format_range(&self.member_ids())
    }

    pub fn status(&self) -> GroupStatus {
        status::group_status(&self.members)
    }

    pub fn progress(&self) -> f64 {
        status::group_progress(&self.members)
    }
}

/// Directed edge between two distinct groups: some member of `to` depends on a member of
/// `from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
    pub from: GroupId,
    pub to: GroupId,
}

#[derive(Debug, Clone)]
pub struct Grouping {
    pub groups: Vec<JobGroup>,
    /// Dependency id -> ids of the jobs waiting on it. Keys include inactive dependencies.
    pub adjacency: BTreeMap<String, Vec<JobId>>,
    /// Edges between distinct groups, ordered by target group then parent id.
    pub edges: Vec<GraphEdge>,
    job_group: HashMap<String, usize>,
    group_index: HashMap<GroupId, usize>,
    graph: Graph<(), ()>,
}

impl Grouping {
    pub fn group(&self, id: &GroupId) -> Option<&JobGroup> {
        self.group_index.get(id).map(|&ix| &self.groups[ix])
    }

    pub fn group_index(&self, id: &GroupId) -> Option<usize> {
        self.group_index.get(id).copied()
    }

    /// The group holding the job whose key (decimal id) is `job_key`.
    pub fn group_of_key(&self, job_key: &str) -> Option<&JobGroup> {
        self.job_group.get(job_key).map(|&ix| &self.groups[ix])
    }

    pub fn group_of(&self, job_id: JobId) -> Option<&JobGroup> {
        self.group_of_key(&job_id.to_string())
    }

    /// Group-level dependency graph. Unlike [`Grouping::edges`] it keeps self loops, which
    /// appear when a job depends on a job sharing its signature (or on itself).
    pub fn graph(&self) -> &Graph<(), ()> {
        &self.graph
    }

    /// Indices of the groups that `ix`'s parent ids resolve to, in parent id order.
    pub(crate) fn parent_group_indices(&self, ix: usize) -> Vec<usize> {
        self.graph
            .predecessors(self.groups[ix].id.as_str())
            .into_iter()
            .filter_map(|id| self.group_index.get(&GroupId::from(id)).copied())
            .collect()
    }
}

/// Partitions `jobs` into signature groups and derives the inter-group edges. Levels are left
/// at 0; see [`crate::level::assign_levels`].
pub fn group_jobs(jobs: &[Job]) -> Grouping {
    let mut adjacency: BTreeMap<String, BTreeSet<JobId>> = BTreeMap::new();
    for job in jobs {
        for parent in &job.depends_on {
            adjacency.entry(parent.clone()).or_default().insert(job.id);
        }
    }

    let mut by_signature: BTreeMap<Signature, Vec<Job>> = BTreeMap::new();
    for job in jobs {
        let children = adjacency
            .get(&job.key())
            .into_iter()
            .flatten()
            .map(ToString::to_string);
        let signature = Signature::new(job.depends_on.iter().cloned(), children);
        by_signature.entry(signature).or_default().push(job.clone());
    }

    let mut groups: Vec<JobGroup> = by_signature
        .into_iter()
        .map(|(signature, mut members)| {
            members.sort_by_key(|j| j.id);
            JobGroup {
                id: GroupId(signature.key()),
                signature,
                members,
                level: 0,
            }
        })
        .collect();
    groups.sort_by(|a, b| {
        a.min_member_id()
            .cmp(&b.min_member_id())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut job_group: HashMap<String, usize> = HashMap::default();
    let mut group_index: HashMap<GroupId, usize> = HashMap::default();
    for (ix, group) in groups.iter().enumerate() {
        group_index.insert(group.id.clone(), ix);
        for member in &group.members {
            job_group.insert(member.key(), ix);
        }
    }

    let mut graph: Graph<(), ()> = Graph::new();
    for group in &groups {
        graph.ensure_node(group.id.as_str());
    }
    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut inactive = 0usize;
    for (target, group) in groups.iter().enumerate() {
        for parent in group.parent_ids() {
            let Some(&source) = job_group.get(parent) else {
                inactive += 1;
                continue;
            };
            graph.set_edge(groups[source].id.as_str(), group.id.as_str());
            if source != target && seen.insert((source, target)) {
                edges.push(GraphEdge {
                    from: groups[source].id.clone(),
                    to: group.id.clone(),
                });
            }
        }
    }

    for group in &groups {
        tracing::trace!(
            group = %group.id,
            members = group.members.len(),
            parents = group.parent_ids().len(),
            children = group.child_ids().len(),
            "job group"
        );
    }
    tracing::debug!(
        jobs = jobs.len(),
        groups = groups.len(),
        edges = edges.len(),
        "grouped jobs by dependency signature"
    );
    if inactive > 0 {
        tracing::debug!(
            inactive,
            "group parent ids resolve to no present job (inactive dependencies)"
        );
    }

    Grouping {
        groups,
        adjacency: adjacency
            .into_iter()
            .map(|(parent, children)| (parent, children.into_iter().collect()))
            .collect(),
        edges,
        job_group,
        group_index,
        graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_key_escapes_separators() {
        let plain = Signature::new(vec!["1".to_string(), "2".to_string()], Vec::new());
        let odd = Signature::new(vec!["1,2".to_string()], Vec::new());
        assert_eq!(plain.key(), "1,2|");
        assert_eq!(odd.key(), "1\\,2|");
        assert_ne!(plain.key(), odd.key());
    }

    #[test]
    fn ids_sort_numerically_before_names() {
        let sig = Signature::new(
            ["10", "9", "job-a", "100", "9"].map(String::from),
            Vec::new(),
        );
        assert_eq!(sig.parents, vec!["9", "10", "100", "job-a"]);
    }
}
