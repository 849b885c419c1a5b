//! Ordering-constraint derivation.
//!
//! Conjunct containers force their children into a contiguous block; warrants force their
//! source's visual column to sit beside the edge they warrant. Both are expressed as a small
//! separate constraint graph plus a handful of zero-size sentinel vertices that the barycenter
//! sort in [`crate::order`] treats just like any other vertex in the layer.

use crate::model::{DummyKind, LayoutGraph};
use argraph::{Graph, GraphOptions};

/// `u -> v` meaning "u must end up left of v" within a single layer.
pub type ConstraintGraph = Graph<(), (), ()>;

pub fn new_constraint_graph() -> ConstraintGraph {
    ConstraintGraph::new(GraphOptions {
        multigraph: false,
        compound: false,
        directed: true,
    })
}

pub fn start_c(container: &str) -> String {
    format!("start-c({container})")
}

pub fn end_c(container: &str) -> String {
    format!("end-c({container})")
}

pub fn start_rs(sink: &str) -> String {
    format!("start-rs({sink})")
}

pub fn end_rs(sink: &str) -> String {
    format!("end-rs({sink})")
}

/// A sentinel the constraint graph references, which must also be given a place in the working
/// layout graph's layer so the sort actually positions it.
#[derive(Debug, Clone)]
pub struct Sentinel {
    pub id: String,
    pub rank: f64,
    pub kind: DummyKind,
    pub width: f64,
}

/// Builds the constraint graph and the sentinels it references. Does not mutate `g`.
pub fn build_constraints(g: &LayoutGraph) -> (ConstraintGraph, Vec<Sentinel>) {
    let mut cg = new_constraint_graph();
    let mut sentinels = Vec::new();

    for c in g.node_ids() {
        let Some(label) = g.node(&c) else { continue };
        if !label.is_conjunct_node {
            continue;
        }
        let children = g.children(&c);
        if children.is_empty() {
            continue;
        }
        let Some(rank) = label.rank else { continue };

        let s = start_c(&c);
        let e = end_c(&c);
        cg.ensure_node(s.clone());
        cg.ensure_node(e.clone());
        sentinels.push(Sentinel {
            id: s.clone(),
            rank,
            kind: DummyKind::ConjunctSentinel,
            width: 0.0,
        });
        sentinels.push(Sentinel {
            id: e.clone(),
            rank,
            kind: DummyKind::ConjunctSentinel,
            width: 0.0,
        });
        for child in children {
            cg.ensure_node(child.to_string());
            cg.set_edge(s.clone(), child.to_string());
            cg.set_edge(child.to_string(), e.clone());
        }
    }

    for sink in g.node_ids() {
        let Some(sink_label) = g.node(&sink) else { continue };
        if !sink_label.is_warrant_sink {
            continue;
        }
        let Some((u, w)) = sink.split_once(" -> ") else {
            continue;
        };
        let (Some(u_rank), Some(w_rank)) = (
            g.node(u).and_then(|n| n.rank),
            g.node(w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        let width = g
            .first_predecessor(&sink)
            .and_then(|s| g.node(s))
            .map(|n| n.width)
            .unwrap_or(0.0);

        let sc = start_rs(&sink);
        let ec = end_rs(&sink);
        cg.ensure_node(sc.clone());
        cg.ensure_node(ec.clone());
        cg.ensure_node(u.to_string());
        cg.ensure_node(w.to_string());
        cg.set_edge(u.to_string(), sc.clone());
        cg.set_edge(w.to_string(), ec.clone());
        sentinels.push(Sentinel {
            id: sc,
            rank: u_rank,
            kind: DummyKind::WarrantSentinel,
            width,
        });
        sentinels.push(Sentinel {
            id: ec,
            rank: w_rank,
            kind: DummyKind::WarrantSentinel,
            width,
        });
    }

    (cg, sentinels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_model::{set_conjunct_node, set_warrant_edge, warrant_sink_id};
    use crate::model::Edge;
    use argraph::GraphOptions as GOpts;

    fn graph() -> LayoutGraph {
        LayoutGraph::new(GOpts {
            compound: true,
            ..Default::default()
        })
    }

    #[test]
    fn conjunct_children_get_contiguity_constraints() {
        let mut g = graph();
        g.ensure_node("a");
        g.ensure_node("b");
        g.ensure_node("c");
        g.set_edge("a", "c");
        set_conjunct_node(&mut g, "b", "a", "c").unwrap();

        for v in ["a", "b", "-> c", "c"] {
            if let Some(n) = g.node_mut(v) {
                n.rank = Some(0.0);
            }
        }

        let (cg, sentinels) = build_constraints(&g);
        assert_eq!(sentinels.len(), 2);
        assert!(cg.has_edge("start-c(-> c)", "a", None) || cg.has_edge("start-c(-> c)", "b", None));
        assert!(cg.has_edge("a", "end-c(-> c)", None) || cg.has_edge("b", "end-c(-> c)", None));
    }

    #[test]
    fn warrant_gets_adjacency_sentinels() {
        let mut g = graph();
        g.ensure_node("a");
        g.ensure_node("c");
        g.ensure_node("b");
        g.set_edge("a", "c");
        set_warrant_edge(&mut g, "b", "a", "c", Edge::default()).unwrap();

        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("c").unwrap().rank = Some(2.0);

        let (cg, sentinels) = build_constraints(&g);
        let sink = warrant_sink_id("a", "c");
        assert_eq!(sentinels.len(), 2);
        assert!(cg.has_edge("a", &start_rs(&sink), None));
        assert!(cg.has_edge("c", &end_rs(&sink), None));
    }
}
