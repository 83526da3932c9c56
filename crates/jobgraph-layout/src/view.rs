//! Interactive view state: manual node positions and group expansion.
//!
//! This is the only mutable state the engine keeps across recomputations. It is owned by the
//! caller and handed to [`layout`](crate::position::layout) by reference; one writer applies
//! one interaction at a time.

use crate::group::{GroupId, Grouping};
use crate::position::Point;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    #[default]
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    overrides: BTreeMap<String, Point>,
    expanded: BTreeSet<GroupId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the node with stable id `node_id` (a group id or `job-<id>`) at `to`. The pin
    /// survives recomputation until cleared.
    pub fn move_node(&mut self, node_id: impl Into<String>, to: Point) {
        self.overrides.insert(node_id.into(), to);
    }

    pub fn override_for(&self, node_id: &str) -> Option<Point> {
        self.overrides.get(node_id).copied()
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, Point)> {
        self.overrides.iter().map(|(id, p)| (id.as_str(), *p))
    }

    pub fn clear_override(&mut self, node_id: &str) -> Option<Point> {
        self.overrides.remove(node_id)
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn group_state(&self, id: &GroupId) -> GroupState {
        if self.expanded.contains(id) {
            GroupState::Expanded
        } else {
            GroupState::Collapsed
        }
    }

    pub fn is_expanded(&self, id: &GroupId) -> bool {
        self.group_state(id) == GroupState::Expanded
    }

    /// Flips the group between collapsed and expanded and returns the new state.
    pub fn toggle_group(&mut self, id: &GroupId) -> GroupState {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
        self.group_state(id)
    }

    pub fn set_expanded(&mut self, id: &GroupId, expanded: bool) {
        if expanded {
            self.expanded.insert(id.clone());
        } else {
            self.expanded.remove(id);
        }
    }

    pub fn expanded_groups(&self) -> impl Iterator<Item = &GroupId> {
        self.expanded.iter()
    }

    /// Forgets expansion flags of groups missing from `grouping`. Position overrides are left
    /// alone; they are only dropped by an explicit clear.
    pub fn retain_groups(&mut self, grouping: &Grouping) {
        self.expanded.retain(|id| grouping.group(id).is_some());
    }
}
