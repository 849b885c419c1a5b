//! Coordinate assignment through the full pipeline, exercising the argument-map extensions: a
//! conjunct container lays its children out as one contiguous block, and a warrant sink settles
//! at its source's half-integer rank.

use arglayout::{layout, set_conjunct_node, set_warrant_edge, warrant_sink_id, Edge, Graph, LayoutConfig};
use argraph::GraphOptions;

fn compound_graph() -> Graph {
    Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    })
}

#[test]
fn conjunct_premises_end_up_as_one_contiguous_block() {
    let mut g = compound_graph();
    g.ensure_node("p1");
    g.ensure_node("p2");
    g.ensure_node("conclusion");
    g.set_edge("p1", "conclusion");
    set_conjunct_node(&mut g, "p2", "p1", "conclusion").unwrap();

    layout(&mut g, LayoutConfig::default()).unwrap();

    let x1 = g.node("p1").unwrap().x.unwrap();
    let x2 = g.node("p2").unwrap().x.unwrap();
    let w1 = g.node("p1").unwrap().width;
    let w2 = g.node("p2").unwrap().width;

    // Contiguous: the gap between centers equals half of each width plus the configured nodesep.
    let gap = (x1 - x2).abs();
    let expected = w1 / 2.0 + w2 / 2.0 + LayoutConfig::default().nodesep;
    assert!((gap - expected).abs() < 1e-6);

    // Rank must agree: both premises merged under one container and ranked together.
    assert_eq!(g.node("p1").unwrap().rank, g.node("p2").unwrap().rank);
}

#[test]
fn warrant_sink_settles_at_source_plus_half_rank() {
    let mut g = compound_graph();
    g.set_edge("u", "w");
    g.ensure_node("s");
    set_warrant_edge(&mut g, "s", "u", "w", Edge::default()).unwrap();

    layout(&mut g, LayoutConfig::default()).unwrap();

    let ru = g.node("u").unwrap().rank.unwrap();
    let sink = warrant_sink_id("u", "w");
    let rsink = g.node(&sink).unwrap().rank.unwrap();
    assert!((rsink - (ru + 0.5)).abs() < 1e-9);
}

#[test]
fn warrant_sink_x_matches_its_simple_source() {
    let mut g = compound_graph();
    g.set_edge("u", "w");
    g.ensure_node("s");
    set_warrant_edge(&mut g, "s", "u", "w", Edge::default()).unwrap();

    layout(&mut g, LayoutConfig::default()).unwrap();

    let sx = g.node("s").unwrap().x.unwrap();
    let sink = warrant_sink_id("u", "w");
    let sink_x = g.node(&sink).unwrap().x.unwrap();
    assert!((sx - sink_x).abs() < 1e-6);
}
