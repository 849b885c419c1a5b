//! Cycle removal round-trip: the edge set (ignoring routed `points`) must come back exactly as
//! given, including self-loops, regardless of how greedy FAS chose to break the cycle.

use arglayout::{layout, Graph, LayoutConfig};
use argraph::GraphOptions;

fn graph() -> Graph {
    Graph::new(GraphOptions::default())
}

#[test]
fn three_cycle_is_restored_with_original_direction() {
    let mut g = graph();
    g.set_edge("a", "b");
    g.set_edge("b", "c");
    g.set_edge("c", "a");

    layout(&mut g, LayoutConfig::default()).unwrap();

    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "c", None));
    assert!(g.has_edge("c", "a", None));
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn self_loop_survives_layout() {
    let mut g = graph();
    g.set_edge("a", "b");
    g.set_edge("a", "a");

    layout(&mut g, LayoutConfig::default()).unwrap();

    assert!(g.has_edge("a", "a", None));
    assert!(g.node("a").unwrap().x.is_some());
}

fn endpoints(g: &Graph) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = g.edge_keys().into_iter().map(|k| (k.v, k.w)).collect();
    pairs.sort();
    pairs
}

#[test]
fn already_acyclic_tree_is_unaffected() {
    let mut g = graph();
    g.set_edge("root", "left");
    g.set_edge("root", "right");

    let before = endpoints(&g);
    layout(&mut g, LayoutConfig::default()).unwrap();
    let after = endpoints(&g);

    assert_eq!(before, after);
}

#[test]
fn larger_cycle_with_extra_chords_is_fully_restored() {
    let mut g = graph();
    for (v, w) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")] {
        g.set_edge(v, w);
    }
    let expected = endpoints(&g);

    layout(&mut g, LayoutConfig::default()).unwrap();

    let actual = endpoints(&g);
    assert_eq!(expected, actual);
}
