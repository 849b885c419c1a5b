use argraph::{Graph, GraphOptions};

#[test]
fn set_node_is_idempotent_on_id() {
    let mut g: Graph<i32, (), ()> = Graph::new(GraphOptions::default());
    g.set_node("a", 1);
    g.set_node("a", 2);
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.node("a"), Some(&2));
}

#[test]
fn remove_node_cascades_to_incident_edges() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    g.set_edge("a", "b");
    g.set_edge("b", "c");
    g.remove_node("b");

    assert!(!g.has_node("b"));
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.successors("a"), Vec::<&str>::new());
    assert_eq!(g.predecessors("c"), Vec::<&str>::new());
}

#[test]
fn remove_node_cascades_to_children() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions { compound: true, ..Default::default() });
    g.ensure_node("parent");
    g.ensure_node("child");
    g.set_parent("child", "parent");
    g.remove_node("parent");

    assert_eq!(g.parent("child"), None);
}

#[test]
fn indices_stay_stable_across_removal() {
    let mut g: Graph<i32, (), ()> = Graph::new(GraphOptions::default());
    g.set_node("a", 1);
    g.set_node("b", 2);
    let a_ix = g.node_ix("a").unwrap();
    g.remove_node("a");
    g.set_node("c", 3);

    // "a"'s slot may be reused by length, but "b" must never move.
    let b_ix = g.node_ix("b").unwrap();
    assert_eq!(g.node_label_by_ix(b_ix), Some(&2));
    let _ = a_ix;
}

#[test]
fn set_path_chains_edges() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    g.set_path(&["a", "b", "c", "d"]);
    assert_eq!(g.edge_count(), 3);
    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "c", None));
    assert!(g.has_edge("c", "d", None));
}

#[test]
fn multigraph_distinguishes_named_edges() {
    let mut g: Graph<(), i32, ()> = Graph::new(GraphOptions { multigraph: true, ..Default::default() });
    g.set_edge_named("a", "b", Some("first"), Some(1));
    g.set_edge_named("a", "b", Some("second"), Some(2));

    assert_eq!(g.edge("a", "b", Some("first")), Some(&1));
    assert_eq!(g.edge("a", "b", Some("second")), Some(&2));
    assert_eq!(g.out_edges("a", Some("b")).len(), 2);
}

#[test]
fn children_of_empty_string_are_top_level_nodes() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions { compound: true, ..Default::default() });
    g.ensure_node("parent");
    g.ensure_node("child");
    g.set_parent("child", "parent");

    let mut top = g.children("");
    top.sort();
    assert_eq!(top, vec!["parent"]);
}

#[test]
fn sources_and_sinks() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    g.set_path(&["a", "b", "c"]);

    assert_eq!(g.sources(), vec!["a"]);
    assert_eq!(g.sinks(), vec!["c"]);
}

#[test]
fn preorder_and_postorder_visit_reachable_nodes() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    g.set_path(&["a", "b", "c"]);

    assert_eq!(argraph::alg::preorder(&g, &["a"]), vec!["a", "b", "c"]);
    assert_eq!(argraph::alg::postorder(&g, &["a"]), vec!["c", "b", "a"]);
}

#[test]
fn find_cycles_reports_self_loops_and_sccs() {
    let mut g: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    g.set_edge("a", "a");
    g.set_path(&["b", "c", "d"]);
    g.set_edge("d", "b");

    let cycles = argraph::alg::find_cycles(&g);
    assert_eq!(cycles.len(), 2);
    assert!(cycles.iter().any(|c| c == &vec!["a".to_string()]));
    assert!(cycles.iter().any(|c| c.len() == 3));
}
