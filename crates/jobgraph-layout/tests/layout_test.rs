use jobgraph_core::{Job, JobStatus};
use jobgraph_layout::{
    DependencyGraph, GroupId, GroupState, LayoutConfig, NodeKind, Point, ViewState, job_node_id,
};

fn job(id: u64, deps: &[&str]) -> Job {
    Job::new(id, JobStatus::Pending).with_depends_on(deps.iter().copied())
}

fn diamond() -> DependencyGraph {
    DependencyGraph::build(vec![
        job(1, &[]),
        job(2, &["1"]),
        job(3, &["1"]),
        job(4, &["2", "3"]),
    ])
}

/// Three independent two-job chains: 1 -> 4, 2 -> 5, 3 -> 6.
fn three_lanes() -> DependencyGraph {
    DependencyGraph::build(vec![
        job(1, &[]),
        job(2, &[]),
        job(3, &[]),
        job(4, &["1"]),
        job(5, &["2"]),
        job(6, &["3"]),
    ])
}

fn position(layout: &jobgraph_layout::GraphLayout, id: &str) -> Point {
    layout
        .node(id)
        .unwrap_or_else(|| panic!("missing node {id}"))
        .position
}

#[test]
fn layout_places_levels_left_to_right() {
    let layout = diamond().layout(&ViewState::new(), &LayoutConfig::default());
    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(position(&layout, "|2,3"), Point::new(100.0, 300.0));
    assert_eq!(position(&layout, "1|4"), Point::new(350.0, 300.0));
    assert_eq!(position(&layout, "2,3|"), Point::new(600.0, 300.0));
    assert_eq!(layout.edges.len(), 2);
}

#[test]
fn layout_centers_each_level_vertically() {
    let layout = three_lanes().layout(&ViewState::new(), &LayoutConfig::default());
    let ys: Vec<f64> = ["|4", "|5", "|6"]
        .iter()
        .map(|id| position(&layout, id).y)
        .collect();
    assert_eq!(ys, vec![200.0, 300.0, 400.0]);
    assert!(
        ["1|", "2|", "3|"]
            .iter()
            .all(|id| position(&layout, id).x == 350.0)
    );
}

#[test]
fn layout_uses_the_configured_spacing() {
    let config = LayoutConfig {
        level_spacing: 10.0,
        node_spacing: 4.0,
        level_offset_x: 0.0,
        level_offset_y: 0.0,
    };
    let layout = three_lanes().layout(&ViewState::new(), &config);
    assert_eq!(position(&layout, "|4"), Point::new(0.0, -4.0));
    assert_eq!(position(&layout, "|6"), Point::new(0.0, 4.0));
    assert_eq!(position(&layout, "2|"), Point::new(10.0, 0.0));
}

#[test]
fn an_override_moves_only_the_pinned_node() {
    let graph = three_lanes();
    let mut view = ViewState::new();
    view.move_node("|5", Point::new(10.0, 20.0));

    let layout = graph.layout(&view, &LayoutConfig::default());
    let pinned = layout.node("|5").unwrap();
    assert!(pinned.pinned);
    assert_eq!(pinned.position, Point::new(10.0, 20.0));
    assert_eq!(position(&layout, "|4"), Point::new(100.0, 200.0));
    assert_eq!(position(&layout, "|6"), Point::new(100.0, 400.0));
    assert!(!layout.node("|4").unwrap().pinned);

    view.clear_override("|5");
    let layout = graph.layout(&view, &LayoutConfig::default());
    assert_eq!(position(&layout, "|5"), Point::new(100.0, 300.0));
}

#[test]
fn overrides_survive_recomputation() {
    let mut view = ViewState::new();
    view.move_node("1|4", Point::new(-5.0, -5.0));

    let rebuilt = diamond();
    let layout = rebuilt.layout(&view, &LayoutConfig::default());
    assert_eq!(position(&layout, "1|4"), Point::new(-5.0, -5.0));
}

#[test]
fn expanding_a_group_lists_its_members_and_drops_its_edges() {
    let graph = diamond();
    let mut view = ViewState::new();
    let middle = GroupId::from("1|4");
    assert_eq!(view.toggle_group(&middle), GroupState::Expanded);

    let layout = graph.layout(&view, &LayoutConfig::default());
    assert!(layout.node("1|4").is_none());
    let first = layout.node(&job_node_id(2)).unwrap();
    let second = layout.node(&job_node_id(3)).unwrap();
    assert_eq!(first.kind, NodeKind::Job);
    assert_eq!(first.group_id, middle);
    assert_eq!(first.job_id, Some(2));
    assert_eq!(first.position, Point::new(350.0, 250.0));
    assert_eq!(second.position, Point::new(350.0, 350.0));
    assert!(layout.edges.is_empty());

    assert_eq!(view.toggle_group(&middle), GroupState::Collapsed);
    let layout = graph.layout(&view, &LayoutConfig::default());
    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.edges.len(), 2);
}

#[test]
fn group_nodes_carry_summary_fields() {
    let graph = DependencyGraph::build(vec![
        Job::new(1, JobStatus::Completed),
        Job::new(2, JobStatus::Completed).with_depends_on(["1"]),
        Job::new(3, JobStatus::Running).with_depends_on(["1"]),
        Job::new(4, JobStatus::Pending).with_depends_on(["1"]),
        Job::new(5, JobStatus::Pending).with_depends_on(["1"]),
    ]);
    let layout = graph.layout(&ViewState::new(), &LayoutConfig::default());
    let node = layout.node("1|").unwrap();
    assert_eq!(node.kind, NodeKind::Group);
    assert_eq!(node.label, "2-5 (4)");
    assert_eq!(node.member_count, 4);
    assert_eq!(node.status, "RUNNING");
    assert_eq!(node.progress, 25.0);
    assert_eq!(node.level, 1);
}

#[test]
fn bounds_cover_every_node() {
    let layout = three_lanes().layout(&ViewState::new(), &LayoutConfig::default());
    let bounds = layout.bounds().unwrap();
    assert_eq!((bounds.min_x, bounds.max_x), (100.0, 350.0));
    assert_eq!((bounds.min_y, bounds.max_y), (200.0, 400.0));

    let empty =
        DependencyGraph::build(Vec::new()).layout(&ViewState::new(), &LayoutConfig::default());
    assert!(empty.nodes.is_empty());
    assert!(empty.bounds().is_none());
}

#[test]
fn retain_groups_forgets_vanished_groups() {
    let graph = diamond();
    let mut view = ViewState::new();
    view.set_expanded(&GroupId::from("1|4"), true);
    view.set_expanded(&GroupId::from("gone|"), true);
    view.move_node("gone|", Point::new(1.0, 1.0));

    view.retain_groups(graph.grouping());
    let expanded: Vec<&GroupId> = view.expanded_groups().collect();
    assert_eq!(expanded, vec![&GroupId::from("1|4")]);
    assert_eq!(view.override_for("gone|"), Some(Point::new(1.0, 1.0)));
}

#[test]
fn layout_serializes_with_camel_case_fields() {
    let layout = diamond().layout(&ViewState::new(), &LayoutConfig::default());
    let value = serde_json::to_value(&layout).unwrap();
    let node = &value["nodes"][0];
    assert_eq!(node["id"], "|2,3");
    assert_eq!(node["kind"], "group");
    assert_eq!(node["groupId"], "|2,3");
    assert_eq!(node["memberCount"], 1);
    assert!(node.get("jobId").is_none());
    assert_eq!(value["edges"][0]["from"], "|2,3");
}
