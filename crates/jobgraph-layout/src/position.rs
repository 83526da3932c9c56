//! Level-based positioning.
//!
//! Levels advance left to right; the nodes of one level are stacked vertically and centered on
//! `level_offset_y`. An expanded group is replaced by its members, listed in its slot. A manual
//! override moves only the overridden node; its siblings keep their computed coordinates.
//!
//! Edges are kept only between two collapsed groups. An edge that touches an expanded group is
//! dropped rather than rerouted to the member jobs.

use crate::config::LayoutConfig;
use crate::group::{GraphEdge, GroupId, Grouping, JobGroup};
use crate::view::ViewState;
use jobgraph_core::{Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Job,
}

/// Stable node id of an individually rendered job.
pub fn job_node_id(id: JobId) -> String {
    format!("job-{id}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Group id for group nodes, `job-<id>` for member nodes of an expanded group.
    pub id: String,
    pub kind: NodeKind,
    pub group_id: GroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub level: usize,
    /// Position within the level, top to bottom.
    pub index: usize,
    pub position: Point,
    /// Set when `position` comes from a manual override.
    pub pinned: bool,
    pub label: String,
    pub display_name: String,
    pub status: String,
    pub color: String,
    pub member_count: usize,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Bounding box of all node positions; `None` without nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?.position;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.nodes.iter().fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.position.x),
            min_y: b.min_y.min(n.position.y),
            max_x: b.max_x.max(n.position.x),
            max_y: b.max_y.max(n.position.y),
        }))
    }
}

enum Slot<'a> {
    Group(&'a JobGroup),
    Member(&'a JobGroup, &'a Job),
}

impl Slot<'_> {
    fn id(&self) -> String {
        match self {
            Slot::Group(group) => group.id.to_string(),
            Slot::Member(_, job) => job_node_id(job.id),
        }
    }
}

/// Computes node coordinates for every rendered node of `grouping`, in level order.
pub fn layout(grouping: &Grouping, view: &ViewState, config: &LayoutConfig) -> GraphLayout {
    let mut levels: BTreeMap<usize, Vec<Slot<'_>>> = BTreeMap::new();
    for group in &grouping.groups {
        let slots = levels.entry(group.level).or_default();
        if view.is_expanded(&group.id) {
            slots.extend(group.members.iter().map(|job| Slot::Member(group, job)));
        } else {
            slots.push(Slot::Group(group));
        }
    }

    let mut nodes: Vec<LayoutNode> = Vec::new();
    for (&level, slots) in &levels {
        let count = slots.len();
        for (index, slot) in slots.iter().enumerate() {
            let id = slot.id();
            let computed = level_position(config, level, index, count);
            let pinned = view.override_for(&id);
            let position = pinned.unwrap_or(computed);
            nodes.push(match slot {
                Slot::Group(group) => {
                    let status = group.status();
                    LayoutNode {
                        id,
                        kind: NodeKind::Group,
                        group_id: group.id.clone(),
                        job_id: None,
                        level,
                        index,
                        position,
                        pinned: pinned.is_some(),
                        label: group.label(),
                        display_name: group.display_name().to_string(),
                        status: status.as_str().to_string(),
                        color: status.color().to_string(),
                        member_count: group.members.len(),
                        progress: group.progress(),
                    }
                }
                Slot::Member(group, job) => LayoutNode {
                    id,
                    kind: NodeKind::Job,
                    group_id: group.id.clone(),
                    job_id: Some(job.id),
                    level,
                    index,
                    position,
                    pinned: pinned.is_some(),
                    label: job.id.to_string(),
                    display_name: job.group_name.clone(),
                    status: job.status.as_str().to_string(),
                    color: job.status.color().to_string(),
                    member_count: 1,
                    progress: if job.status == JobStatus::Completed {
                        100.0
                    } else {
                        0.0
                    },
                },
            });
        }
    }

    let edges: Vec<GraphEdge> = grouping
        .edges
        .iter()
        .filter(|e| !view.is_expanded(&e.from) && !view.is_expanded(&e.to))
        .cloned()
        .collect();

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped_edges = grouping.edges.len() - edges.len(),
        pinned = nodes.iter().filter(|n| n.pinned).count(),
        "computed layout"
    );
    GraphLayout { nodes, edges }
}

/// Formula position of item `index` out of `count` on `level`.
pub fn level_position(config: &LayoutConfig, level: usize, index: usize, count: usize) -> Point {
    let spread = count.saturating_sub(1) as f64 * config.node_spacing / 2.0;
    Point {
        x: level as f64 * config.level_spacing + config.level_offset_x,
        y: -spread + index as f64 * config.node_spacing + config.level_offset_y,
    }
}
