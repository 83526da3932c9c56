//! Topological depth of each group.
//!
//! `level(g) = 1 + max(level(parent))`, or 0 when no parent id resolves to a group. This is
//! the longest-path ranking, evaluated depth first with a result table and an in-progress mark
//! instead of recursion: a parent that is still on the active path (a cycle) contributes 0 for
//! that occurrence and nothing is cached for it at that point.

use crate::group::Grouping;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done(usize),
}

struct Frame {
    group: usize,
    next_parent: usize,
    deepest_parent: Option<usize>,
}

/// Computes levels for every group of `grouping` and stores them in `JobGroup::level`.
pub fn assign_levels(grouping: &mut Grouping) {
    let levels = compute_levels(grouping);
    for (group, level) in grouping.groups.iter_mut().zip(levels) {
        group.level = level;
    }
}

/// Levels indexed like `grouping.groups`.
pub fn compute_levels(grouping: &Grouping) -> Vec<usize> {
    let n = grouping.groups.len();
    let parents: Vec<Vec<usize>> = (0..n)
        .map(|ix| grouping.parent_group_indices(ix))
        .collect();

    let mut marks = vec![Mark::Unvisited; n];
    let mut cycle_hits = 0usize;
    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        let mut stack = vec![Frame {
            group: root,
            next_parent: 0,
            deepest_parent: None,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&parent) = parents[frame.group].get(frame.next_parent) {
                frame.next_parent += 1;
                match marks[parent] {
                    Mark::Done(level) => {
                        frame.deepest_parent = frame.deepest_parent.max(Some(level));
                    }
                    Mark::InProgress => {
                        cycle_hits += 1;
                        frame.deepest_parent = frame.deepest_parent.max(Some(0));
                    }
                    Mark::Unvisited => {
                        marks[parent] = Mark::InProgress;
                        stack.push(Frame {
                            group: parent,
                            next_parent: 0,
                            deepest_parent: None,
                        });
                    }
                }
                continue;
            }

            let group = frame.group;
            let level = frame.deepest_parent.map_or(0, |deepest| deepest + 1);
            stack.pop();
            marks[group] = Mark::Done(level);
            if let Some(child) = stack.last_mut() {
                child.deepest_parent = child.deepest_parent.max(Some(level));
            }
        }
    }

    let levels: Vec<usize> = marks
        .into_iter()
        .map(|m| match m {
            Mark::Done(level) => level,
            Mark::Unvisited | Mark::InProgress => 0,
        })
        .collect();

    if cycle_hits > 0 {
        tracing::warn!(
            cycle_hits,
            "dependency cycle between job groups; levels along the cycle are approximate"
        );
    }
    tracing::debug!(
        groups = n,
        max_level = levels.iter().copied().max().unwrap_or(0),
        "assigned group levels"
    );
    levels
}
