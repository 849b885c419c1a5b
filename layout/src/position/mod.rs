//! Coordinate assignment: restores conjunct containers to single positioning units, runs
//! Brandes-Köpf horizontal compaction, then re-expands each container's children left-to-right
//! from its left edge.

pub mod bk;

use crate::model::{DummyKind, LayoutGraph};
use crate::order::constraints::{end_c, start_c};
use crate::order::init_order::layer_matrix_from_order;
use rustc_hash::FxHashMap as HashMap;

/// Runs the full positioning phase in place: every vertex with a rank ends up with an `x` (and,
/// via [`crate::rank::assign_ranks`]'s earlier pass, a `y`).
pub fn assign_positions(g: &mut LayoutGraph) {
    restore_conjunct_containers(g);

    let layering = layer_matrix_from_order(g);
    let mut xs = bk::position_x(g, &layering);
    expand_conjunct_containers(g, &mut xs);

    for (v, x) in xs {
        if let Some(n) = g.node_mut(&v) {
            n.x = Some(x);
        }
    }

    remove_warrant_sentinels(g);
}

/// Collapses each conjunct container's children (and its ordering sentinels) into the container
/// itself, which becomes a single positioning unit with width = sum of child widths plus
/// `(k-1) * nodesep`. The container already has exactly one outgoing edge (to its conjunct
/// target) by the time ranking finishes splitting it back apart, so no extra conflict marking is
/// needed for it.
fn restore_conjunct_containers(g: &mut LayoutGraph) {
    let nodesep = g.graph().nodesep;

    let containers: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).map(|n| n.is_conjunct_node).unwrap_or(false))
        .collect();

    for c in containers {
        let mut children: Vec<String> = g.children(&c).into_iter().map(|s| s.to_string()).collect();
        if children.is_empty() {
            continue;
        }
        children.sort_by_key(|ch| g.node(ch).and_then(|n| n.order).unwrap_or(usize::MAX));

        let mut total_width = 0.0;
        let mut min_order: Option<usize> = None;
        for ch in &children {
            let Some(n) = g.node_mut(ch) else { continue };
            total_width += n.width;
            if let Some(o) = n.order {
                min_order = Some(min_order.map_or(o, |m| m.min(o)));
            }
            n.order = None;
        }
        total_width += (children.len().saturating_sub(1)) as f64 * nodesep;

        g.remove_node(&start_c(&c));
        g.remove_node(&end_c(&c));

        if let Some(n) = g.node_mut(&c) {
            n.width = total_width;
            n.order = min_order;
            n.is_conjunct_dummy_node = true;
            n.conjunct_children = children;
        }
    }
}

/// Undoes [`restore_conjunct_containers`] after `xs` is final: each child is placed left-to-right
/// starting at the container's left edge, spaced by its own width plus `nodesep`.
fn expand_conjunct_containers(g: &mut LayoutGraph, xs: &mut HashMap<String, f64>) {
    let nodesep = g.graph().nodesep;

    let containers: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).map(|n| n.is_conjunct_dummy_node).unwrap_or(false))
        .collect();

    for c in containers {
        let Some(&cx) = xs.get(&c) else { continue };
        let (width, children) = match g.node(&c) {
            Some(n) => (n.width, n.conjunct_children.clone()),
            None => continue,
        };

        let mut cursor = cx - width / 2.0;
        for child in &children {
            let w = g.node(child).map(|n| n.width).unwrap_or(0.0);
            xs.insert(child.clone(), cursor + w / 2.0);
            cursor += w + nodesep;
        }
        xs.remove(&c);

        if let Some(n) = g.node_mut(&c) {
            n.is_conjunct_dummy_node = false;
            n.conjunct_children.clear();
        }
    }
}

/// Warrant sentinels only ever existed to reserve horizontal space during crossing minimization
/// and positioning; nothing downstream (routing) looks at them.
fn remove_warrant_sentinels(g: &mut LayoutGraph) {
    let sentinels: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| matches!(g.node(v).and_then(|n| n.dummy), Some(DummyKind::WarrantSentinel)))
        .collect();
    for s in sentinels {
        g.remove_node(&s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_model::set_conjunct_node;
    use argraph::GraphOptions;

    fn graph() -> LayoutGraph {
        LayoutGraph::new(GraphOptions {
            compound: true,
            ..Default::default()
        })
    }

    #[test]
    fn conjunct_container_becomes_a_single_wide_block_then_expands() {
        let mut g = graph();
        g.ensure_node("a");
        g.ensure_node("b");
        g.ensure_node("c");
        g.set_edge("a", "c");
        set_conjunct_node(&mut g, "b", "a", "c").unwrap();

        let container = "-> c";
        for (v, rank, order) in [(container, 0.0, 0usize), ("c", 1.0, 0usize)] {
            let n = g.node_mut(v).unwrap();
            n.rank = Some(rank);
            n.order = Some(order);
        }
        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("a").unwrap().order = Some(0);
        g.node_mut("a").unwrap().width = 100.0;
        g.node_mut("b").unwrap().rank = Some(0.0);
        g.node_mut("b").unwrap().order = Some(1);
        g.node_mut("b").unwrap().width = 100.0;
        g.graph_mut().nodesep = 50.0;

        restore_conjunct_containers(&mut g);
        assert!(!g.has_node("start-c(-> c)"));
        assert_eq!(g.node(container).unwrap().width, 250.0);

        let mut xs: HashMap<String, f64> = HashMap::default();
        xs.insert(container.to_string(), 1000.0);
        expand_conjunct_containers(&mut g, &mut xs);

        assert!(!xs.contains_key(container));
        let xa = xs["a"];
        let xb = xs["b"];
        assert!((xb - xa - 150.0).abs() < 1e-6);
        assert!((((xa + xb) / 2.0) - 1000.0).abs() < 1e-6);
    }
}
