//! Layer assignment: longest-path initialization, tight-tree growth, and network-simplex cut-value
//! iteration, bracketed by argument-map pre-merge and post-layering adjustments.

use crate::graph_model::warrant_sink_id;
use crate::model::{Edge, LayoutGraph, Vertex};
use argraph::{EdgeKey, Graph, GraphOptions, alg};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use tracing::warn;

pub struct RankingOutcome {
    pub cap_reached: bool,
}

/// Runs the full layering phase in place: pre-merge, initial ranking, network simplex, and the
/// post-layering adjustments (normalize, balance, conjunct/warrant splitting, y-coordinates).
pub fn assign_ranks(g: &mut LayoutGraph, max_loops: usize) -> RankingOutcome {
    let conjuncts = merge_conjunct_containers(g);
    let warrants = stash_warrants(g);

    let mut simplified = simplify(g);
    longest_path(&mut simplified);
    let mut tree = feasible_tree(&mut simplified);
    init_low_lim_values(&mut tree, None);
    init_cut_values(&mut tree, &simplified);

    let mut iterations = 0usize;
    let mut cap_reached = false;
    while let Some(e) = leave_edge(&tree) {
        if iterations >= max_loops {
            cap_reached = true;
            warn!(
                vertices = g.node_count(),
                edges = g.edge_count(),
                "layering hit max_ranking_loops before cut values converged"
            );
            break;
        }
        let f = enter_edge(&tree, &simplified, &e);
        exchange_edges(&mut tree, &mut simplified, &e, &f);
        iterations += 1;
    }

    for v in g.node_ids() {
        if let Some(rank) = simplified.node(&v).and_then(|n| n.rank) {
            if let Some(lbl) = g.node_mut(&v) {
                lbl.rank = Some(rank);
            }
        }
    }

    normalize_ranks(g);
    balance(g);
    split_conjunct_containers(g, conjuncts);
    restore_warrants(g, warrants);
    set_y_coordinates(g);

    RankingOutcome { cap_reached }
}

// -- Pre-merge: conjunct containers --------------------------------------------------------------

struct ConjunctChild {
    id: String,
    label: Vertex,
    in_edges: Vec<(String, Edge)>,
    out_edges: Vec<(String, Edge)>,
}

struct ConjunctMerge {
    container: String,
    children: Vec<ConjunctChild>,
}

/// Collapses each conjunct container's children into the container: every other edge a child
/// carries is redirected onto the container and the child vertex is removed, so the whole
/// premise cluster ranks as a single point. `split_conjunct_containers` undoes this exactly.
fn merge_conjunct_containers(g: &mut LayoutGraph) -> Vec<ConjunctMerge> {
    let containers: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).map(|n| n.is_conjunct_node).unwrap_or(false))
        .collect();

    let mut merges = Vec::new();
    for container in containers {
        let child_ids: Vec<String> = g.children(&container).into_iter().map(|s| s.to_string()).collect();
        let mut children = Vec::new();

        for child in child_ids {
            let label = g.node(&child).cloned().unwrap_or_default();

            let mut in_edges = Vec::new();
            for e in g.in_edges(&child, None) {
                if e.v == container {
                    continue;
                }
                if let Some(lbl) = g.remove_edge(&e.v, &e.w, None) {
                    in_edges.push((e.v.clone(), lbl));
                }
            }

            let mut out_edges = Vec::new();
            for e in g.out_edges(&child, None) {
                if e.w == container {
                    continue;
                }
                if let Some(lbl) = g.remove_edge(&e.v, &e.w, None) {
                    out_edges.push((e.w.clone(), lbl));
                }
            }

            for (src, lbl) in &in_edges {
                g.set_edge_with_label(src.clone(), container.clone(), lbl.clone());
            }
            for (dst, lbl) in &out_edges {
                g.set_edge_with_label(container.clone(), dst.clone(), lbl.clone());
            }

            g.remove_node(&child);
            children.push(ConjunctChild {
                id: child,
                label,
                in_edges,
                out_edges,
            });
        }

        merges.push(ConjunctMerge { container, children });
    }
    merges
}

fn split_conjunct_containers(g: &mut LayoutGraph, merges: Vec<ConjunctMerge>) {
    for merge in merges {
        let container_rank = g.node(&merge.container).and_then(|n| n.rank);
        for child in merge.children {
            let ConjunctChild {
                id,
                mut label,
                in_edges,
                out_edges,
            } = child;
            label.rank = container_rank;
            g.set_node(id.clone(), label);
            g.set_parent(&id, &merge.container);

            for (src, lbl) in in_edges {
                g.remove_edge(&src, &merge.container, None);
                g.set_edge_with_label(src, id.clone(), lbl);
            }
            for (dst, lbl) in out_edges {
                g.remove_edge(&merge.container, &dst, None);
                g.set_edge_with_label(id.clone(), dst, lbl);
            }
        }
    }
}

// -- Pre-merge: warrants --------------------------------------------------------------------------

struct WarrantStash {
    source: String,
    sink: String,
    sink_label: Vertex,
    source_to_sink: Edge,
    u: String,
    w: String,
}

/// Removes each warrant sink (and the source's edge to it) before ranking: the sink's rank is
/// fully determined by the invariant in [`restore_warrants`], not by graph connectivity.
fn stash_warrants(g: &mut LayoutGraph) -> Vec<WarrantStash> {
    let mut stashes = Vec::new();
    let sinks: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).map(|n| n.is_warrant_sink).unwrap_or(false))
        .collect();

    for sink in sinks {
        let Some((u, w)) = split_warrant_sink_id(&sink) else {
            continue;
        };
        if !g.has_node(&u) || !g.has_node(&w) {
            continue;
        }

        let Some(source) = g.predecessors(&sink).into_iter().next().map(|s| s.to_string()) else {
            continue;
        };

        let Some(source_to_sink) = g.remove_edge(&source, &sink, None) else {
            continue;
        };
        let Some(sink_label) = g.remove_node(&sink) else {
            continue;
        };

        stashes.push(WarrantStash {
            source,
            sink,
            sink_label,
            source_to_sink,
            u,
            w,
        });
    }

    stashes
}

fn split_warrant_sink_id(id: &str) -> Option<(String, String)> {
    id.split_once(" -> ").map(|(u, w)| (u.to_string(), w.to_string()))
}

/// Re-inserts every warrant sink at `rank(u) + 0.5`. A half-integer rank always fits strictly
/// between the integer ranks of `u` and `w` without disturbing anything else, since a warranted
/// edge is a direct, tight (minlen-1) inference step and so `rank(w) == rank(u) + 1` already.
fn restore_warrants(g: &mut LayoutGraph, stashes: Vec<WarrantStash>) {
    for stash in stashes {
        let u_rank = g.node(&stash.u).and_then(|n| n.rank).unwrap_or(0.0);

        g.set_node(stash.sink.clone(), stash.sink_label);
        if let Some(lbl) = g.node_mut(&stash.sink) {
            lbl.rank = Some(u_rank + 0.5);
        }
        g.set_edge_with_label(stash.source.clone(), stash.sink.clone(), stash.source_to_sink);
        if let Some(lbl) = g.node_mut(&stash.source) {
            lbl.rank = Some(u_rank + 0.5);
        }
    }
}

// -- Initial feasible ranking (longest path) -------------------------------------------------------

fn longest_path(g: &mut LayoutGraph) {
    fn dfs(v: &str, g: &mut LayoutGraph, visited: &mut HashMap<String, f64>) -> f64 {
        if let Some(&rank) = visited.get(v) {
            return rank;
        }

        let out_edges = g.out_edges(v, None);
        let mut rank: Option<f64> = None;
        for e in out_edges {
            let minlen = g.edge_by_key(&e).map(|lbl| lbl.minlen as f64).unwrap_or(1.0);
            let candidate = dfs(&e.w, g, visited) - minlen;
            rank = Some(match rank {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        }

        let rank = rank.unwrap_or(0.0);
        if let Some(label) = g.node_mut(v) {
            label.rank = Some(rank);
        }
        visited.insert(v.to_string(), rank);
        rank
    }

    let sources: Vec<String> = g.sources().into_iter().map(|s| s.to_string()).collect();
    let mut visited: HashMap<String, f64> = HashMap::default();
    for v in sources {
        dfs(&v, g, &mut visited);
    }
}

pub fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank = f64::MAX;
    g.for_each_node(|_id, n| {
        if let Some(r) = n.rank {
            min_rank = min_rank.min(r);
        }
    });
    if min_rank == f64::MAX {
        return;
    }
    g.for_each_node_mut(|_id, n| {
        if let Some(r) = n.rank {
            n.rank = Some(r - min_rank);
        }
    });
}

fn set_y_coordinates(g: &mut LayoutGraph) {
    let ranksep = g.graph().ranksep;
    g.for_each_node_mut(|_id, n| {
        if let Some(r) = n.rank {
            n.y = Some(r * ranksep);
        }
    });
}

/// Balance: vertices with equal in/out degree and more than one feasible rank move to the least
/// populated rank in their feasible range. Purely cosmetic.
fn balance(g: &mut LayoutGraph) {
    let key = |r: f64| (r * 2.0).round() as i64;
    let mut counts: HashMap<i64, usize> = HashMap::default();
    for v in g.node_ids() {
        if let Some(r) = g.node(&v).and_then(|n| n.rank) {
            *counts.entry(key(r)).or_insert(0) += 1;
        }
    }

    for v in g.node_ids() {
        let in_edges = g.in_edges(&v, None);
        let out_edges = g.out_edges(&v, None);
        if in_edges.len() != out_edges.len() || in_edges.is_empty() {
            continue;
        }

        let mut max_pred: f64 = f64::NEG_INFINITY;
        for e in &in_edges {
            let Some(pr) = g.node(&e.v).and_then(|n| n.rank) else {
                continue;
            };
            let minlen = g.edge_by_key(e).map(|lbl| lbl.minlen as f64).unwrap_or(1.0);
            max_pred = max_pred.max(pr + minlen);
        }
        let mut min_succ: f64 = f64::INFINITY;
        for e in &out_edges {
            let Some(sr) = g.node(&e.w).and_then(|n| n.rank) else {
                continue;
            };
            let minlen = g.edge_by_key(e).map(|lbl| lbl.minlen as f64).unwrap_or(1.0);
            min_succ = min_succ.min(sr - minlen);
        }

        if !max_pred.is_finite() || !min_succ.is_finite() || min_succ - max_pred <= 1.0 {
            continue;
        }

        let lo = max_pred.round() as i64;
        let hi = min_succ.round() as i64;
        let mut best_rank = lo;
        let mut best_count = usize::MAX;
        for r in lo..=hi {
            let count = counts.get(&key(r as f64)).copied().unwrap_or(0);
            if count < best_count {
                best_count = count;
                best_rank = r;
            }
        }

        let old_rank = g.node(&v).and_then(|n| n.rank);
        if let Some(old) = old_rank {
            if let Some(c) = counts.get_mut(&key(old)) {
                *c = c.saturating_sub(1);
            }
        }
        *counts.entry(key(best_rank as f64)).or_insert(0) += 1;
        if let Some(lbl) = g.node_mut(&v) {
            lbl.rank = Some(best_rank as f64);
        }
    }
}

// -- Simplify: collapse to a simple (non-compound, non-multigraph) graph for the simplex solver --

fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified = LayoutGraph::new(GraphOptions {
        multigraph: false,
        compound: false,
        directed: true,
    });
    simplified.set_graph(g.graph().clone());

    for v in g.node_ids() {
        if let Some(lbl) = g.node(&v) {
            simplified.set_node(v, lbl.clone());
        }
    }

    let mut merged: HashMap<(String, String), (f64, usize)> = HashMap::default();
    for e in g.edges() {
        let lbl = g.edge_by_key(e).cloned().unwrap_or_default();
        let entry = merged.entry((e.v.clone(), e.w.clone())).or_insert((0.0, 0));
        entry.0 += lbl.weight;
        entry.1 = entry.1.max(lbl.minlen);
    }

    for ((v, w), (weight, minlen)) in merged {
        simplified.set_edge_with_label(
            v,
            w,
            Edge {
                weight,
                minlen,
                ..Default::default()
            },
        );
    }

    simplified
}

// -- Tight tree -------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct TreeNode {
    low: i32,
    lim: i32,
    parent: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct TreeEdge {
    cut_value: f64,
}

type Tree = Graph<TreeNode, TreeEdge, ()>;

/// `Tree` is built with `directed: false`, but the underlying storage still keys edges by the
/// exact (v, w) order they were inserted in — these helpers look up a tree edge regardless of
/// which of its two endpoints was stored first.
fn tree_has_edge(t: &Tree, a: &str, b: &str) -> bool {
    t.has_edge(a, b, None) || t.has_edge(b, a, None)
}

fn tree_cut_value(t: &Tree, a: &str, b: &str) -> Option<f64> {
    t.edge(a, b, None)
        .or_else(|| t.edge(b, a, None))
        .map(|e| e.cut_value)
}

fn tree_set_cut_value(t: &mut Tree, a: &str, b: &str, value: f64) {
    if let Some(e) = t.edge_mut(a, b, None) {
        e.cut_value = value;
    } else if let Some(e) = t.edge_mut(b, a, None) {
        e.cut_value = value;
    }
}

fn feasible_tree(g: &mut LayoutGraph) -> Tree {
    let mut t: Tree = Tree::new(GraphOptions {
        directed: false,
        ..GraphOptions::default()
    });

    let Some(start) = g.nodes().next().map(|s| s.to_string()) else {
        return t;
    };
    let size = g.node_count();
    t.set_node(start, TreeNode::default());

    while tight_tree(&mut t, g) < size {
        let Some((slack, in_v)) = find_min_slack_edge(g, &t) else {
            let Some(next_root) = g.nodes().find(|v| !t.has_node(v)).map(|s| s.to_string()) else {
                break;
            };
            t.set_node(next_root, TreeNode::default());
            continue;
        };
        let delta = if in_v { slack } else { -slack };
        shift_ranks(&t, g, delta);
    }

    t
}

/// Iteratively grows `t` by following zero-slack edges out of its current frontier.
fn tight_tree(t: &mut Tree, g: &LayoutGraph) -> usize {
    let mut stack: Vec<String> = t.node_ids();
    while let Some(v) = stack.pop() {
        let mut incident: Vec<(String, f64)> = Vec::new();
        for e in g.out_edges(&v, None) {
            if let Some(s) = edge_slack(g, &e) {
                incident.push((e.w.clone(), s));
            }
        }
        for e in g.in_edges(&v, None) {
            if let Some(s) = edge_slack(g, &e) {
                incident.push((e.v.clone(), s));
            }
        }

        for (other, slack) in incident {
            if !t.has_node(&other) && slack == 0.0 {
                t.set_node(other.clone(), TreeNode::default());
                t.set_edge(v.clone(), other.clone());
                stack.push(other);
            }
        }
    }
    t.node_count()
}

fn edge_slack(g: &LayoutGraph, key: &EdgeKey) -> Option<f64> {
    let lbl = g.edge_by_key(key)?;
    let v_rank = g.node(&key.v).and_then(|n| n.rank).unwrap_or(0.0);
    let w_rank = g.node(&key.w).and_then(|n| n.rank).unwrap_or(0.0);
    Some(w_rank - v_rank - lbl.minlen as f64)
}

fn find_min_slack_edge(g: &LayoutGraph, t: &Tree) -> Option<(f64, bool)> {
    let mut best: Option<(f64, bool)> = None;
    for key in g.edge_keys() {
        let in_v = t.has_node(&key.v);
        let in_w = t.has_node(&key.w);
        if in_v == in_w {
            continue;
        }
        let Some(slack) = edge_slack(g, &key) else {
            continue;
        };
        match &best {
            Some((best_slack, _)) if slack >= *best_slack => {}
            _ => best = Some((slack, in_v)),
        }
    }
    best
}

fn shift_ranks(t: &Tree, g: &mut LayoutGraph, delta: f64) {
    for v in t.nodes() {
        if let Some(label) = g.node_mut(v) {
            if let Some(rank) = label.rank {
                label.rank = Some(rank + delta);
            }
        }
    }
}

// -- Cut-value network simplex ----------------------------------------------------------------------

/// One DFS stack frame: the vertex, its parent, the `low` value it starts with, and the
/// neighbors still left to visit. An explicit stack rather than recursion so deeply chained
/// inputs don't blow the call stack.
struct Frame {
    v: String,
    parent: Option<String>,
    low: i32,
    neighbors: Vec<String>,
    next_neighbor: usize,
}

fn push_frame(
    tree: &Tree,
    visited: &mut HashSet<String>,
    stack: &mut Vec<Frame>,
    v: String,
    parent: Option<String>,
    next_lim: i32,
) {
    visited.insert(v.clone());
    let neighbors: Vec<String> = tree
        .neighbors(&v)
        .into_iter()
        .filter(|w| parent.as_deref() != Some(*w))
        .map(|s| s.to_string())
        .collect();
    stack.push(Frame {
        v,
        parent,
        low: next_lim,
        neighbors,
        next_neighbor: 0,
    });
}

fn init_low_lim_values(tree: &mut Tree, root: Option<&str>) {
    let Some(root) = root
        .map(|s| s.to_string())
        .or_else(|| tree.nodes().next().map(|s| s.to_string()))
    else {
        return;
    };

    let mut visited: HashSet<String> = HashSet::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut next_lim: i32 = 1;
    push_frame(tree, &mut visited, &mut stack, root, None, next_lim);

    while !stack.is_empty() {
        let next_child = {
            let Some(top) = stack.last_mut() else { break };
            top.neighbors
                .get(top.next_neighbor)
                .cloned()
                .inspect(|_| top.next_neighbor += 1)
                .map(|w| (w, top.v.clone()))
        };

        if let Some((w, parent)) = next_child {
            if visited.contains(&w) {
                continue;
            }
            push_frame(tree, &mut visited, &mut stack, w, Some(parent), next_lim);
            continue;
        }

        let Some(frame) = stack.pop() else { break };
        if let Some(label) = tree.node_mut(&frame.v) {
            label.low = frame.low;
            label.lim = next_lim;
            label.parent = frame.parent;
        }
        next_lim += 1;
    }
}

fn init_cut_values(t: &mut Tree, g: &LayoutGraph) {
    let roots: Vec<&str> = t.nodes().collect();
    let mut vs = alg::postorder(t, &roots);
    vs.pop();
    for v in vs {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut Tree, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|lbl| lbl.parent.clone()) else {
        return;
    };
    let cut_value = calc_cut_value(t, g, child, &parent);
    tree_set_cut_value(t, child, &parent, cut_value);
}

fn calc_cut_value(t: &Tree, g: &LayoutGraph, child: &str, parent: &str) -> f64 {
    let mut child_is_tail = true;
    let mut graph_edge = g.edge(child, parent, None);
    if graph_edge.is_none() {
        child_is_tail = false;
        graph_edge = g.edge(parent, child, None);
    }
    let Some(graph_edge) = graph_edge else {
        return 0.0;
    };

    let mut cut_value = graph_edge.weight;

    for e in g.out_edges(child, None) {
        let other = e.w.clone();
        if other == parent {
            continue;
        }
        let Some(lbl) = g.edge_by_key(&e) else { continue };
        let points_to_head = child_is_tail;
        cut_value += if points_to_head { lbl.weight } else { -lbl.weight };
        if tree_has_edge(t, child, &other) {
            if let Some(other_cut_value) = tree_cut_value(t, child, &other) {
                cut_value += if points_to_head { -other_cut_value } else { other_cut_value };
            }
        }
    }

    for e in g.in_edges(child, None) {
        let other = e.v.clone();
        if other == parent {
            continue;
        }
        let Some(lbl) = g.edge_by_key(&e) else { continue };
        let points_to_head = !child_is_tail;
        cut_value += if points_to_head { lbl.weight } else { -lbl.weight };
        if tree_has_edge(t, child, &other) {
            if let Some(other_cut_value) = tree_cut_value(t, child, &other) {
                cut_value += if points_to_head { -other_cut_value } else { other_cut_value };
            }
        }
    }

    cut_value
}

fn leave_edge(t: &Tree) -> Option<EdgeKey> {
    t.edges()
        .find(|e| t.edge_by_key(e).map(|lbl| lbl.cut_value < 0.0).unwrap_or(false))
        .cloned()
}

fn enter_edge(t: &Tree, g: &LayoutGraph, edge: &EdgeKey) -> EdgeKey {
    let (v, w) = if g.has_edge(&edge.v, &edge.w, None) {
        (edge.v.as_str(), edge.w.as_str())
    } else {
        (edge.w.as_str(), edge.v.as_str())
    };

    let mut t_labels: HashMap<String, (i32, i32)> = HashMap::default();
    for id in t.nodes() {
        if let Some(lbl) = t.node(id) {
            t_labels.insert(id.to_string(), (lbl.low, lbl.lim));
        }
    }

    let Some(&(_, v_lim)) = t_labels.get(v) else {
        return edge.clone();
    };
    let Some(&(_, w_lim)) = t_labels.get(w) else {
        return edge.clone();
    };
    let ((tail_low, tail_lim), flip) = if v_lim > w_lim {
        (t_labels[w], true)
    } else {
        (t_labels[v], false)
    };

    let mut best: Option<(f64, EdgeKey)> = None;
    for key in g.edge_keys() {
        let Some(&(_, v_lim)) = t_labels.get(&key.v) else { continue };
        let Some(&(_, w_lim)) = t_labels.get(&key.w) else { continue };
        let v_desc = tail_low <= v_lim && v_lim <= tail_lim;
        let w_desc = tail_low <= w_lim && w_lim <= tail_lim;

        if flip == v_desc && flip != w_desc {
            let Some(slack) = edge_slack(g, &key) else { continue };
            match &best {
                Some((best_slack, _)) if slack >= *best_slack => {}
                _ => best = Some((slack, key.clone())),
            }
        }
    }

    best.map(|(_, e)| e).unwrap_or_else(|| edge.clone())
}

fn exchange_edges(t: &mut Tree, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge(f.v.clone(), f.w.clone());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

fn update_ranks(t: &Tree, g: &mut LayoutGraph) {
    let Some(root) = t
        .nodes()
        .find(|v| t.node(v).map(|lbl| lbl.parent.is_none()).unwrap_or(false))
        .or_else(|| t.nodes().next())
    else {
        return;
    };

    let vs = alg::preorder(t, &[root]);
    for v in vs.into_iter().skip(1) {
        let Some(parent) = t.node(&v).and_then(|lbl| lbl.parent.clone()) else {
            continue;
        };

        let (minlen, flipped) = match g.edge(&v, &parent, None) {
            Some(e) => (e.minlen as f64, false),
            None => {
                let Some(e) = g.edge(&parent, &v, None) else { continue };
                (e.minlen as f64, true)
            }
        };

        let Some(parent_rank) = g.node(&parent).and_then(|n| n.rank) else {
            continue;
        };
        let rank = if flipped { parent_rank + minlen } else { parent_rank - minlen };
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
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
    fn simple_chain_gets_increasing_ranks() {
        let mut g = graph();
        g.set_path(&["a", "b", "c"]);
        assign_ranks(&mut g, 100);

        let ra = g.node("a").unwrap().rank.unwrap();
        let rb = g.node("b").unwrap().rank.unwrap();
        let rc = g.node("c").unwrap().rank.unwrap();
        assert_eq!(ra, 0.0);
        assert_eq!(rb, 1.0);
        assert_eq!(rc, 2.0);
    }

    #[test]
    fn three_into_one_shares_a_rank() {
        let mut g = graph();
        for v in ["a", "b", "c"] {
            g.set_edge(v, "d");
        }
        g.set_edge("a", "e");
        assign_ranks(&mut g, 100);

        for v in ["a", "b", "c"] {
            assert_eq!(g.node(v).unwrap().rank, Some(0.0));
        }
        assert_eq!(g.node("d").unwrap().rank, Some(1.0));
        assert_eq!(g.node("e").unwrap().rank, Some(1.0));
    }

    #[test]
    fn conjunct_children_share_the_container_rank() {
        let mut g = LayoutGraph::new(GraphOptions {
            compound: true,
            ..Default::default()
        });
        g.ensure_node("a");
        g.ensure_node("b");
        g.ensure_node("c");
        crate::graph_model::set_conjunct_node(&mut g, "b", "a", "c").unwrap();
        assign_ranks(&mut g, 100);

        let container = "-> c";
        let container_rank = g.node(container).unwrap().rank.unwrap();
        assert_eq!(g.node("a").unwrap().rank, Some(container_rank));
        assert_eq!(g.node("b").unwrap().rank, Some(container_rank));
        assert_eq!(g.node("c").unwrap().rank, Some(container_rank + 1.0));
    }

    #[test]
    fn warrant_sink_sits_at_a_half_rank() {
        let mut g = graph();
        g.set_edge("a", "c");
        g.ensure_node("b");
        crate::graph_model::set_warrant_edge(&mut g, "b", "a", "c", Edge::default()).unwrap();
        assign_ranks(&mut g, 100);

        let sink = warrant_sink_id("a", "c");
        let a_rank = g.node("a").unwrap().rank.unwrap();
        assert_eq!(g.node(&sink).unwrap().rank, Some(a_rank + 0.5));
        assert_eq!(g.node("c").unwrap().rank, Some(a_rank + 1.0));
    }
}
