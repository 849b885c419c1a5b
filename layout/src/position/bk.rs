//! Brandes-Köpf horizontal compaction: type-1 conflict marking, four-pass vertical alignment,
//! block-graph horizontal compaction, and median-of-four balancing.
//!
//! Only type-1 conflicts are tracked, and `sep` has no label-position delta term: this engine has
//! no recursive cluster borders and no separate edge-label geometry, so separation between any two
//! same-rank neighbors is just half of each one's width plus `nodesep`.

use crate::model::LayoutGraph;
use argraph::{Graph, GraphOptions};
use rustc_hash::FxHashMap as HashMap;
use std::collections::{BTreeMap, BTreeSet};

pub type Conflicts = BTreeMap<String, BTreeSet<String>>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.get(v).map(|m| m.contains(w)).unwrap_or(false)
}

/// An inner segment is one hop of a long edge's dummy chain. Two inner segments never conflict
/// with each other (they're allowed to cross); a real vertex crossing an inner segment does.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts: Conflicts = BTreeMap::new();
    if layering.is_empty() {
        return conflicts;
    }

    for i in 1..layering.len() {
        let prev_layer = &layering[i - 1];
        let layer = &layering[i];

        let mut k0: usize = 0;
        let mut scan_pos: usize = 0;
        let prev_layer_len = prev_layer.len();
        let last_node = layer.last().map(|s| s.as_str());

        for (idx, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w
                .as_deref()
                .and_then(|w| g.node(w))
                .and_then(|n| n.order)
                .unwrap_or(prev_layer_len);

            if w.is_some() || last_node == Some(v.as_str()) {
                for scan_node in layer.iter().skip(scan_pos).take(idx + 1 - scan_pos) {
                    for u in g.predecessors(scan_node) {
                        let Some(u_label) = g.node(u) else {
                            continue;
                        };
                        let u_pos = u_label.order.unwrap_or(0);
                        let scan_dummy = g
                            .node(scan_node)
                            .map(|n| n.dummy.is_some())
                            .unwrap_or(false);
                        let u_dummy = u_label.dummy.is_some();

                        if (u_pos < k0 || k1 < u_pos) && !(u_dummy && scan_dummy) {
                            add_conflict(&mut conflicts, u, scan_node);
                        }
                    }
                }
                scan_pos = idx + 1;
                k0 = k1;
            }
        }
    }

    conflicts
}

fn find_other_inner_segment_node(g: &LayoutGraph, v: &str) -> Option<String> {
    if g.node(v).map(|n| n.dummy.is_some()).unwrap_or(false) {
        return g
            .predecessors(v)
            .into_iter()
            .find(|u| g.node(u).map(|n| n.dummy.is_some()).unwrap_or(false))
            .map(|u| u.to_string());
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub root: HashMap<String, String>,
    pub align: HashMap<String, String>,
}

/// Links each vertex to at most one median neighbor on the fixed adjacent rank, forming
/// block-aligned chains.
pub fn vertical_alignment<F>(layering: &[Vec<String>], conflicts: &Conflicts, neighbor_fn: F) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: HashMap<String, String> = HashMap::default();
    let mut align: HashMap<String, String> = HashMap::default();
    let mut pos: HashMap<String, usize> = HashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: isize = -1;
        for v in layer {
            let mut ws = neighbor_fn(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));

            let mp = (ws.len() - 1) as f64 / 2.0;
            let i0 = mp.floor() as usize;
            let i1 = mp.ceil() as usize;

            for w in ws.iter().take(i1 + 1).skip(i0) {
                let v_align = align.get(v).cloned().unwrap_or_else(|| v.clone());
                let w_pos = pos.get(w).copied().unwrap_or(usize::MAX) as isize;
                if v_align == *v && prev_idx < w_pos && !has_conflict(conflicts, v, w) {
                    align.insert(w.clone(), v.clone());
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = w_pos;
                }
            }
        }
    }

    Alignment { root, align }
}

/// Longest-path block placement over the blocks `vertical_alignment` produced. Uses an explicit
/// stack rather than recursion so deeply chained inputs don't blow the call stack.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
    align: &HashMap<String, String>,
    reverse_sep: bool,
) -> HashMap<String, f64> {
    let mut xs: HashMap<String, f64> = HashMap::default();
    let block_g = build_block_graph(g, layering, root, reverse_sep);

    fn iterate<F, N>(block_g: &Graph<(), f64, ()>, mut set_xs: F, mut next_nodes: N)
    where
        F: FnMut(&str),
        N: FnMut(&str) -> Vec<String>,
    {
        let mut stack: Vec<String> = block_g.nodes().map(|n| n.to_string()).collect();
        let mut visited: HashMap<String, bool> = HashMap::default();

        while let Some(elem) = stack.pop() {
            if visited.get(&elem).copied().unwrap_or(false) {
                set_xs(&elem);
                continue;
            }

            visited.insert(elem.clone(), true);
            stack.push(elem.clone());
            for next in next_nodes(&elem) {
                stack.push(next);
            }
        }
    }

    {
        let mut set = |elem: &str| {
            let mut best: f64 = 0.0;
            for e in block_g.in_edges(elem, None) {
                let w = *block_g.edge_by_key(&e).unwrap_or(&0.0);
                let x_v = xs.get(&e.v).copied().unwrap_or(0.0);
                best = best.max(x_v + w);
            }
            xs.insert(elem.to_string(), best);
        };
        let next = |elem: &str| {
            block_g
                .predecessors(elem)
                .into_iter()
                .map(|s| s.to_string())
                .collect()
        };
        iterate(&block_g, &mut set, next);
    }

    {
        let mut set = |elem: &str| {
            let mut min: f64 = f64::INFINITY;
            for e in block_g.out_edges(elem, None) {
                let w = *block_g.edge_by_key(&e).unwrap_or(&0.0);
                let x_w = xs.get(&e.w).copied().unwrap_or(0.0);
                min = min.min(x_w - w);
            }
            if min.is_finite() {
                let cur = xs.get(elem).copied().unwrap_or(0.0);
                xs.insert(elem.to_string(), cur.max(min));
            }
        };
        let next = |elem: &str| {
            block_g
                .successors(elem)
                .into_iter()
                .map(|s| s.to_string())
                .collect()
        };
        iterate(&block_g, &mut set, next);
    }

    let mut out: HashMap<String, f64> = HashMap::default();
    for (v, r) in align {
        let x = xs.get(root.get(v).unwrap_or(r)).copied().unwrap_or(0.0);
        out.insert(v.clone(), x);
    }
    out
}

fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
    reverse_sep: bool,
) -> Graph<(), f64, ()> {
    let mut block_graph: Graph<(), f64, ()> = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut u: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
            block_graph.ensure_node(v_root.clone());

            if let Some(u) = u {
                let u_root = root.get(u).cloned().unwrap_or_else(|| u.to_string());
                let prev_max = block_graph
                    .edge(&u_root, &v_root, None)
                    .copied()
                    .unwrap_or(0.0);
                let gap = sep(g, v, u);
                block_graph.set_edge_with_label(u_root, v_root, gap.max(prev_max));
            }

            u = Some(v);
        }
        let _ = reverse_sep;
    }
    block_graph
}

pub fn find_smallest_width_alignment(
    g: &LayoutGraph,
    xss: &HashMap<String, HashMap<String, f64>>,
) -> HashMap<String, f64> {
    let mut best_width: f64 = f64::INFINITY;
    let mut best: HashMap<String, f64> = HashMap::default();

    for key in ["ul", "ur", "dl", "dr"] {
        let Some(xs) = xss.get(key) else {
            continue;
        };
        let mut max: f64 = f64::NEG_INFINITY;
        let mut min: f64 = f64::INFINITY;
        for (v, x) in xs {
            let half_w = width(g, v) / 2.0;
            max = max.max(x + half_w);
            min = min.min(x - half_w);
        }
        let w = max - min;
        if w < best_width {
            best_width = w;
            best = xs.clone();
        }
    }

    best
}

pub fn align_coordinates(
    xss: &mut HashMap<String, HashMap<String, f64>>,
    align_to: &HashMap<String, f64>,
) {
    let align_to_min = align_to.values().copied().fold(f64::INFINITY, f64::min);
    let align_to_max = align_to.values().copied().fold(f64::NEG_INFINITY, f64::max);

    for (vert, horiz) in [("u", "l"), ("u", "r"), ("d", "l"), ("d", "r")] {
        let key = format!("{vert}{horiz}");
        let Some(xs) = xss.get(&key).cloned() else {
            continue;
        };

        let xs_min = xs.values().copied().fold(f64::INFINITY, f64::min);
        let xs_max = xs.values().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut delta = align_to_min - xs_min;
        if horiz != "l" {
            delta = align_to_max - xs_max;
        }

        if delta != 0.0 {
            xss.insert(key, xs.into_iter().map(|(v, x)| (v, x + delta)).collect());
        }
    }
}

/// Each vertex's final x is the average of the two middle values among its four candidate
/// coordinates: always the four-way median, with no single-alignment override.
pub fn balance(xss: &HashMap<String, HashMap<String, f64>>) -> HashMap<String, f64> {
    let Some(xs_ul) = xss.get("ul") else {
        return HashMap::default();
    };

    let mut out: HashMap<String, f64> = HashMap::default();
    for v in xs_ul.keys() {
        let mut vals: Vec<f64> = xss.values().filter_map(|xs| xs.get(v).copied()).collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        if vals.len() >= 4 {
            out.insert(v.clone(), (vals[1] + vals[2]) / 2.0);
        }
    }
    out
}

/// Runs all four (vertical, horizontal) bias combinations and balances the results. `layering`
/// must already have conjunct containers collapsed to single vertices.
pub fn position_x(g: &LayoutGraph, layering: &[Vec<String>]) -> HashMap<String, f64> {
    let conflicts = find_type1_conflicts(g, layering);

    let mut xss: HashMap<String, HashMap<String, f64>> = HashMap::default();

    for vert in ["u", "d"] {
        let mut adjusted_layering = if vert == "u" {
            layering.to_vec()
        } else {
            layering.iter().cloned().rev().collect::<Vec<_>>()
        };

        for horiz in ["l", "r"] {
            if horiz == "r" {
                adjusted_layering = adjusted_layering
                    .iter()
                    .map(|inner| inner.iter().cloned().rev().collect())
                    .collect();
            }

            let neighbor_fn = |v: &str| {
                if vert == "u" {
                    g.predecessors(v)
                        .into_iter()
                        .map(|s| s.to_string())
                        .collect()
                } else {
                    g.successors(v).into_iter().map(|s| s.to_string()).collect()
                }
            };

            let align = vertical_alignment(&adjusted_layering, &conflicts, neighbor_fn);
            let mut xs =
                horizontal_compaction(g, &adjusted_layering, &align.root, &align.align, horiz == "r");
            if horiz == "r" {
                for v in xs.values_mut() {
                    *v = -*v;
                }
            }

            xss.insert(format!("{vert}{horiz}"), xs);
        }
    }

    let smallest = find_smallest_width_alignment(g, &xss);
    align_coordinates(&mut xss, &smallest);
    balance(&xss)
}

fn sep(g: &LayoutGraph, v: &str, w: &str) -> f64 {
    let node_sep = g.graph().nodesep;
    width(g, v) / 2.0 + node_sep + width(g, w) / 2.0
}

fn width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map(|n| n.width).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argraph::GraphOptions as GOpts;

    fn graph() -> LayoutGraph {
        LayoutGraph::new(GOpts::default())
    }

    #[test]
    fn sep_is_half_widths_plus_nodesep() {
        let mut g = graph();
        g.ensure_node("a");
        g.ensure_node("b");
        g.node_mut("a").unwrap().width = 100.0;
        g.node_mut("b").unwrap().width = 200.0;
        g.graph_mut().nodesep = 50.0;
        assert_eq!(sep(&g, "a", "b"), 50.0 + 50.0 + 100.0);
    }

    #[test]
    fn straight_chain_keeps_vertices_aligned() {
        let mut g = graph();
        for (v, rank, order) in [("a", 0.0, 0usize), ("b", 1.0, 0usize), ("c", 2.0, 0usize)] {
            g.ensure_node(v);
            let n = g.node_mut(v).unwrap();
            n.rank = Some(rank);
            n.order = Some(order);
            n.width = 100.0;
        }
        g.set_edge("a", "b");
        g.set_edge("b", "c");

        let layering = vec![vec!["a".to_string()], vec!["b".to_string()], vec!["c".to_string()]];
        let xs = position_x(&g, &layering);
        assert_eq!(xs.get("a"), xs.get("b"));
        assert_eq!(xs.get("b"), xs.get("c"));
    }

    #[test]
    fn three_into_one_centers_the_sink_under_its_parents() {
        let mut g = graph();
        for (v, rank, order) in [("a", 0.0, 0usize), ("b", 0.0, 1), ("c", 0.0, 2), ("d", 1.0, 0)] {
            g.ensure_node(v);
            let n = g.node_mut(v).unwrap();
            n.rank = Some(rank);
            n.order = Some(order);
            n.width = 100.0;
        }
        for v in ["a", "b", "c"] {
            g.set_edge(v, "d");
        }

        let layering = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
        ];
        let xs = position_x(&g, &layering);
        let xb = xs["b"];
        let xd = xs["d"];
        assert!((xb - xd).abs() < 1e-6);
    }
}
