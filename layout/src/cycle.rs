//! Cycle removal: Eades-Lin-Smyth greedy feedback arc set.
//!
//! Grounded directly in the greedy bucket algorithm also used for comparison purposes; see
//! [`crate::greedy_fas`].

use crate::greedy_fas::greedy_fas;
use crate::model::{Edge, LayoutGraph};
use argraph::EdgeKey;
use tracing::debug;

/// A self-loop removed during cycle removal, kept so the router can restore it.
#[derive(Debug, Clone)]
pub struct DeletedLoop {
    pub vertex: String,
    pub label: Edge,
}

/// An edge that was inverted during cycle removal.
#[derive(Debug, Clone)]
pub struct ReversedEdge {
    /// The edge's original endpoints, before reversal.
    pub original: EdgeKey,
    pub label: Edge,
}

#[derive(Debug, Clone, Default)]
pub struct CycleRemovalResult {
    pub deleted_loops: Vec<DeletedLoop>,
    pub reversed_edges: Vec<ReversedEdge>,
}

/// Mutates `g` in place to be acyclic, returning the edges that must be restored after routing.
pub fn remove_cycles(g: &mut LayoutGraph) -> CycleRemovalResult {
    let mut result = CycleRemovalResult::default();

    for v in g.node_ids() {
        if g.has_edge(&v, &v, None) {
            let label = g.remove_edge(&v, &v, None).unwrap_or_default();
            debug!(vertex = %v, "removed self-loop");
            result.deleted_loops.push(DeletedLoop { vertex: v, label });
        }
    }

    let feedback = greedy_fas(g);
    debug!(count = feedback.len(), "reversing feedback edges");

    for e in feedback {
        let Some(label) = g.remove_edge(&e.v, &e.w, None) else {
            continue;
        };
        g.set_edge_with_label(e.w.clone(), e.v.clone(), label.clone());
        result.reversed_edges.push(ReversedEdge {
            original: e,
            label,
        });
    }

    result
}

/// Restores deleted self-loops and swaps reversed edges back to their original orientation,
/// preserving whatever `points` the router already computed for the reversed direction.
pub fn restore_cycles(g: &mut LayoutGraph, result: &CycleRemovalResult) {
    for reversed in &result.reversed_edges {
        let key = &reversed.original;
        let Some(current) = g.remove_edge(&key.w, &key.v, None) else {
            continue;
        };
        let mut restored = reversed.label.clone();
        restored.points = current.points;
        g.set_edge_with_label(key.v.clone(), key.w.clone(), restored);
    }

    for loop_ in &result.deleted_loops {
        g.set_edge_with_label(loop_.vertex.clone(), loop_.vertex.clone(), loop_.label.clone());
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
    fn removes_self_loops_and_records_them() {
        let mut g = graph();
        g.set_edge("a", "a");
        g.set_edge("a", "b");

        let result = remove_cycles(&mut g);
        assert!(!g.has_edge("a", "a", None));
        assert_eq!(result.deleted_loops.len(), 1);
        assert_eq!(result.deleted_loops[0].vertex, "a");
    }

    #[test]
    fn breaks_a_simple_cycle() {
        let mut g = graph();
        g.set_path(&["a", "b", "c"]);
        g.set_edge("c", "a");

        let result = remove_cycles(&mut g);
        assert_eq!(result.reversed_edges.len(), 1);
        assert_eq!(argraph::alg::find_cycles(&g).len(), 0);
    }

    #[test]
    fn restore_round_trips_edge_set() {
        let mut g = graph();
        g.set_path(&["a", "b", "c"]);
        g.set_edge("c", "a");
        g.set_edge("x", "x");

        let result = remove_cycles(&mut g);
        restore_cycles(&mut g, &result);

        assert!(g.has_edge("a", "b", None));
        assert!(g.has_edge("b", "c", None));
        assert!(g.has_edge("c", "a", None));
        assert!(g.has_edge("x", "x", None));
    }
}
