//! Initial layer ordering: a rank/insertion-order sorted DFS, primed for the iterated barycenter
//! sweep.
//!
//! A conjunct container does not itself take part: its children and the `start-c`/`end-c`
//! sentinels `order::mod` inserts around them stand in for it during crossing minimization, and
//! the container is only reconstituted as a single unit once positioning begins. Every other
//! ranked vertex — simple vertices, long-edge dummies, warrant sentinels — participates directly.

use crate::model::LayoutGraph;
use crate::rank_table::rank_key;
use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let ranked: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).and_then(|n| n.rank).is_some())
        .filter(|v| g.children(v).is_empty())
        .collect();

    if ranked.is_empty() {
        return Vec::new();
    }

    let mut insertion_idx: HashMap<String, usize> = HashMap::default();
    for (idx, v) in ranked.iter().enumerate() {
        insertion_idx.insert(v.clone(), idx);
    }

    let mut rank_keys: Vec<i64> = ranked
        .iter()
        .map(|v| rank_key(g.node(v).and_then(|n| n.rank).unwrap()))
        .collect();
    rank_keys.sort_unstable();
    rank_keys.dedup();
    let mut layer_index: HashMap<i64, usize> = HashMap::default();
    for (idx, k) in rank_keys.iter().enumerate() {
        layer_index.insert(*k, idx);
    }

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); rank_keys.len()];
    let mut visited: HashMap<String, bool> = HashMap::default();

    fn dfs(
        g: &LayoutGraph,
        v: &str,
        visited: &mut HashMap<String, bool>,
        layer_index: &HashMap<i64, usize>,
        layers: &mut [Vec<String>],
    ) {
        if visited.get(v).copied().unwrap_or(false) {
            return;
        }
        visited.insert(v.to_string(), true);
        let Some(rank) = g.node(v).and_then(|n| n.rank) else {
            return;
        };
        if let Some(&idx) = layer_index.get(&rank_key(rank)) {
            layers[idx].push(v.to_string());
        }
        for w in g.successors(v) {
            dfs(g, w, visited, layer_index, layers);
        }
    }

    let mut ordered = ranked.clone();
    ordered.sort_by(|a, b| {
        let ra = g.node(a).and_then(|n| n.rank).unwrap_or(f64::MAX);
        let rb = g.node(b).and_then(|n| n.rank).unwrap_or(f64::MAX);
        ra.partial_cmp(&rb)
            .unwrap()
            .then_with(|| insertion_idx[a].cmp(&insertion_idx[b]))
    });

    for v in ordered {
        dfs(g, &v, &mut visited, &layer_index, &mut layers);
    }

    layers
}

/// Groups the current layer matrix straight from each vertex's `rank`/`order` fields, used after
/// the barycenter sweep has settled the `order` field on every ranked vertex.
pub fn layer_matrix_from_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut by_rank: BTreeMap<i64, Vec<(usize, String)>> = BTreeMap::new();
    for v in g.node_ids() {
        let Some(label) = g.node(&v) else { continue };
        let (Some(rank), Some(order)) = (label.rank, label.order) else {
            continue;
        };
        by_rank.entry(rank_key(rank)).or_default().push((order, v));
    }
    by_rank
        .into_values()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use argraph::GraphOptions;

    fn graph() -> LayoutGraph {
        LayoutGraph::new(GraphOptions::default())
    }

    #[test]
    fn buckets_by_rank_in_dfs_order() {
        let mut g = graph();
        g.set_edge("a", "b");
        g.set_edge("a", "c");
        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("b").unwrap().rank = Some(1.0);
        g.node_mut("c").unwrap().rank = Some(1.0);

        let layers = init_order(&g);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0], vec!["a".to_string()]);
        assert_eq!(layers[1].len(), 2);
    }

    #[test]
    fn half_integer_ranks_get_their_own_layer() {
        let mut g = graph();
        g.set_edge("a", "sink");
        g.set_edge("a", "c");
        g.node_mut("a").unwrap().rank = Some(0.0);
        g.node_mut("sink").unwrap().rank = Some(0.5);
        g.node_mut("c").unwrap().rank = Some(1.0);

        let layers = init_order(&g);
        assert_eq!(layers.len(), 3);
    }
}
