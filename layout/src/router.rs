//! Bézier emission and long-edge collapse.
//!
//! Each dummy chain is walked from its recorded head (follow successors while the node is a
//! dummy, accumulate points, delete), emitting a fixed three-point control sequence instead of
//! one point per dummy.

use crate::model::{DummyKind, Edge, LayoutGraph, Point};
use argraph::EdgeKey;

/// Routes every edge still in the graph (including long-edge hops), collapses each dummy chain
/// back into its original edge, and aligns warrant sinks under their simple source.
pub fn route(g: &mut LayoutGraph) {
    let keys = g.edge_keys();
    for key in keys {
        let points = three_point_route(g, &key.v, &key.w);
        if let Some(e) = g.edge_mut_by_key(&key) {
            e.points = points;
        }
    }

    collapse_dummy_chains(g);
    align_warrant_sinks(g);
}

fn node_xy(g: &LayoutGraph, v: &str) -> Point {
    let n = g.node(v);
    Point {
        x: n.and_then(|n| n.x).unwrap_or(0.0),
        y: n.and_then(|n| n.y).unwrap_or(0.0),
    }
}

/// Bend is at `(x(v), y(w))` when `v` fans out to more than one edge (bends near the shared
/// source), else at `(x(w), y(v))` (bends near the shared sink).
fn three_point_route(g: &LayoutGraph, v: &str, w: &str) -> Vec<Point> {
    let start = node_xy(g, v);
    let end = node_xy(g, w);
    let v_degree = g.in_edges(v, None).len() + g.out_edges(v, None).len();

    let bend = if v_degree > 1 {
        Point { x: start.x, y: end.y }
    } else {
        Point { x: end.x, y: start.y }
    };

    vec![start, bend, end]
}

/// Walks each recorded dummy chain head to its non-dummy tail, collapsing the hop edges into one
/// edge carrying the original `(v, w)` key: the first hop's start and bend points, and the last
/// hop's end point.
fn collapse_dummy_chains(g: &mut LayoutGraph) {
    let chains = g.graph().dummy_chains.clone();

    for head in chains {
        let Some(head_label) = g.node(&head).cloned() else {
            continue;
        };
        let (Some(original), Some(weight)) = (head_label.dummy_edge.clone(), head_label.dummy_edge_weight)
        else {
            continue;
        };

        let Some(entry_edge) = g.in_edges(&head, None).into_iter().next() else {
            continue;
        };
        let Some(start_point) = g
            .edge_by_key(&entry_edge)
            .and_then(|e| e.points.first().copied())
        else {
            continue;
        };
        let Some(bend_point) = g
            .edge_by_key(&entry_edge)
            .and_then(|e| e.points.get(1).copied())
        else {
            continue;
        };

        let mut dummies_to_remove = Vec::new();
        let mut v = head.clone();
        let mut last_edge: Option<EdgeKey> = None;
        loop {
            let is_dummy = g
                .node(&v)
                .map(|n| n.dummy == Some(DummyKind::Edge))
                .unwrap_or(false);
            if !is_dummy {
                break;
            }
            let Some(out_edge) = g.out_edges(&v, None).into_iter().next() else {
                break;
            };
            last_edge = Some(out_edge.clone());
            dummies_to_remove.push(v.clone());
            v = out_edge.w.clone();
        }

        let Some(last_edge) = last_edge else { continue };
        let Some(end_point) = g
            .edge_by_key(&last_edge)
            .and_then(|e| e.points.last().copied())
        else {
            continue;
        };

        for dummy in dummies_to_remove {
            g.remove_node(&dummy);
        }

        g.set_edge_with_label(
            original.v.clone(),
            original.w.clone(),
            Edge {
                minlen: 1,
                weight,
                points: vec![start_point, bend_point, end_point],
                ..Edge::default()
            },
        );
    }

    g.graph_mut().dummy_chains.clear();
}

/// A warrant sink has no incoming visual weight of its own; it always sits at its source's x.
fn align_warrant_sinks(g: &mut LayoutGraph) {
    let sinks: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).map(|n| n.is_warrant_sink).unwrap_or(false))
        .collect();

    for sink in sinks {
        let Some(source_x) = g
            .first_predecessor(&sink)
            .and_then(|s| g.node(s))
            .and_then(|n| n.x)
        else {
            continue;
        };
        if let Some(n) = g.node_mut(&sink) {
            n.x = Some(source_x);
        }
    }
}
