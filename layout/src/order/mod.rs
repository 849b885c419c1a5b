//! Crossing minimization: long-edge splitting, the conjunct/warrant constraint graph, and the
//! iterated constrained-barycenter sweep.

pub mod barycenter;
pub mod constraints;
pub mod cross_count;
pub mod init_order;

use crate::model::{DummyKind, Edge, LayoutGraph, Vertex};
use barycenter::{SweepDirection, barycenter, resolve_conflicts, sort};
use constraints::{ConstraintGraph, Sentinel, build_constraints};
use cross_count::cross_count;
use init_order::init_order;
use tracing::warn;

pub struct OrderingOutcome {
    pub cap_reached: bool,
}

/// Splits long edges, builds the constraint graph, runs initial ordering, then repeats the
/// down/up barycenter sweep until the global crossing count stops improving for four rounds or
/// `max_crossing_loops` fires.
pub fn order(g: &mut LayoutGraph, max_crossing_loops: usize) -> OrderingOutcome {
    split_long_edges(g);
    let (cg, sentinels) = build_constraints(g);
    insert_sentinels(g, sentinels);

    let mut layers = init_order(g);
    assign_order(g, &layers);

    if layers.len() < 2 {
        return OrderingOutcome {
            cap_reached: false,
        };
    }

    let max_idx = layers.len() - 1;
    let ranks_down: Vec<usize> = (1..=max_idx).collect();
    let ranks_up: Vec<usize> = (0..max_idx).rev().collect();

    let mut best_cc = cross_count(g, &layers);
    let mut best_layering = layers.clone();
    let mut cap_reached = false;

    let mut i = 0usize;
    let mut rounds_since_best = 0usize;
    while rounds_since_best < 4 {
        if i >= max_crossing_loops {
            cap_reached = true;
            warn!(
                vertices = g.node_count(),
                edges = g.edge_count(),
                "ordering hit max_crossing_loops before crossing count converged"
            );
            break;
        }

        let use_down = i % 2 == 1;
        let bias_right = i % 4 >= 2;
        if use_down {
            sweep(g, &mut layers, &ranks_down, SweepDirection::Down, bias_right, &cg);
        } else {
            sweep(g, &mut layers, &ranks_up, SweepDirection::Up, bias_right, &cg);
        }

        let cc = cross_count(g, &layers);
        if cc < best_cc {
            best_cc = cc;
            best_layering = layers.clone();
            rounds_since_best = 0;
        } else {
            rounds_since_best += 1;
        }
        i += 1;
    }

    assign_order(g, &best_layering);
    OrderingOutcome { cap_reached }
}

fn sweep(
    g: &mut LayoutGraph,
    layers: &mut [Vec<String>],
    ranks: &[usize],
    direction: SweepDirection,
    bias_right: bool,
    cg: &ConstraintGraph,
) {
    for &idx in ranks {
        let movable = layers[idx].clone();
        let entries = barycenter(g, &movable, direction);
        let sort_entries = resolve_conflicts(&entries, cg);
        let result = sort(&sort_entries, bias_right);
        for (i, v) in result.vs.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
        layers[idx] = result.vs;
    }
}

fn assign_order(g: &mut LayoutGraph, layers: &[Vec<String>]) {
    for layer in layers {
        for (i, v) in layer.iter().enumerate() {
            if let Some(n) = g.node_mut(v) {
                n.order = Some(i);
            }
        }
    }
}

fn insert_sentinels(g: &mut LayoutGraph, sentinels: Vec<Sentinel>) {
    for s in sentinels {
        g.set_node(
            s.id,
            Vertex {
                rank: Some(s.rank),
                width: s.width,
                height: 0.0,
                dummy: Some(s.kind),
                ..Vertex::default()
            },
        );
    }
}

/// For each edge spanning more than one rank, inserts `rank(w) - rank(v) - 1` unit-length dummy
/// vertices so every edge spans exactly one rank. Each dummy carries the original edge's key and
/// weight so the router can collapse the chain back into a single Bezier.
fn split_long_edges(g: &mut LayoutGraph) {
    let mut chain_heads = Vec::new();

    for key in g.edge_keys() {
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&key.v).and_then(|n| n.rank),
            g.node(&key.w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        let span = (w_rank - v_rank).round() as i64;
        if span <= 1 {
            continue;
        }

        let Some(label) = g.edge_by_key(&key).cloned() else {
            continue;
        };
        g.remove_edge_key(&key);

        let mut prev = key.v.clone();
        let mut head: Option<String> = None;
        for i in 1..span {
            let dummy_id = format!("__edge_dummy__{}->{}__{}", key.v, key.w, i);
            g.set_node(
                dummy_id.clone(),
                Vertex {
                    rank: Some(v_rank + i as f64),
                    width: 0.0,
                    height: 0.0,
                    dummy: Some(DummyKind::Edge),
                    dummy_edge: Some(key.clone()),
                    dummy_edge_weight: Some(label.weight),
                    ..Vertex::default()
                },
            );
            g.set_edge_with_label(prev.clone(), dummy_id.clone(), hop_edge(&label));
            head.get_or_insert_with(|| dummy_id.clone());
            prev = dummy_id;
        }
        g.set_edge_with_label(prev, key.w.clone(), hop_edge(&label));
        if let Some(head) = head {
            chain_heads.push(head);
        }
    }

    g.graph_mut().dummy_chains.extend(chain_heads);
}

fn hop_edge(original: &Edge) -> Edge {
    Edge {
        minlen: 1,
        weight: original.weight,
        ..Edge::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argraph::GraphOptions;

    fn graph() -> LayoutGraph {
        LayoutGraph::new(GraphOptions::default())
    }

    #[test]
    fn long_edge_gets_dummy_chain() {
        let mut g = graph();
        g.set_edge("a", "d");
        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("d").unwrap().rank = Some(3.0);

        split_long_edges(&mut g);

        assert!(!g.has_edge("a", "d", None));
        assert_eq!(g.graph().dummy_chains.len(), 1);
        let mut v = "a".to_string();
        let mut hops = 0;
        loop {
            let succ = g.successors(&v);
            assert_eq!(succ.len(), 1);
            v = succ[0].to_string();
            hops += 1;
            if v == "d" {
                break;
            }
            assert!(g.node(&v).unwrap().dummy.is_some());
        }
        assert_eq!(hops, 3);
    }

    #[test]
    fn short_edges_are_untouched() {
        let mut g = graph();
        g.set_edge("a", "b");
        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("b").unwrap().rank = Some(1.0);
        split_long_edges(&mut g);
        assert!(g.has_edge("a", "b", None));
    }

    #[test]
    fn ordering_reduces_crossings_on_three_into_one() {
        let mut g = graph();
        for (v, r) in [("a", 0.0), ("b", 0.0), ("c", 0.0), ("d", 1.0), ("e", 1.0)] {
            g.ensure_node(v);
            g.node_mut(v).unwrap().rank = Some(r);
        }
        g.set_edge("a", "d");
        g.set_edge("a", "e");
        g.set_edge("b", "d");
        g.set_edge("c", "d");

        let outcome = order(&mut g, 100);
        assert!(!outcome.cap_reached);

        let layers = init_order::layer_matrix_from_order(&g);
        assert_eq!(cross_count(&g, &layers), 0.0);
    }
}
