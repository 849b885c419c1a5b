//! Bidirectional map between vertex identifiers and ranks.
//!
//! Ranks may be half-integers (warrant sinks sit between adjacent integer ranks), so the rank
//! axis is keyed internally by `round(rank * 2)` to avoid float-equality comparisons while still
//! admitting exact half-integer steps.

use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;

/// Shared with [`crate::order::init_order`] so half-integer warrant-sink ranks get their own
/// layer instead of being floored into a neighboring integer rank.
pub(crate) fn rank_key(r: f64) -> i64 {
    (r * 2.0).round() as i64
}

pub(crate) fn key_rank(k: i64) -> f64 {
    k as f64 / 2.0
}

#[derive(Debug, Clone, Default)]
pub struct RankTable {
    vertex_rank: HashMap<String, f64>,
    rank_vertices: BTreeMap<i64, Vec<String>>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: reinserting `v` into a new rank removes it from any prior rank.
    pub fn set(&mut self, v: &str, rank: f64) {
        self.delete(v);
        self.vertex_rank.insert(v.to_string(), rank);
        self.rank_vertices
            .entry(rank_key(rank))
            .or_default()
            .push(v.to_string());
    }

    pub fn delete(&mut self, v: &str) {
        if let Some(old) = self.vertex_rank.remove(v) {
            let key = rank_key(old);
            if let Some(vertices) = self.rank_vertices.get_mut(&key) {
                vertices.retain(|id| id != v);
                if vertices.is_empty() {
                    self.rank_vertices.remove(&key);
                }
            }
        }
    }

    pub fn rank(&self, v: &str) -> Option<f64> {
        self.vertex_rank.get(v).copied()
    }

    pub fn nodes(&self, rank: f64) -> &[String] {
        self.rank_vertices
            .get(&rank_key(rank))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn min_rank(&self) -> Option<f64> {
        self.rank_vertices.keys().next().copied().map(key_rank)
    }

    pub fn max_rank(&self) -> Option<f64> {
        self.rank_vertices.keys().next_back().copied().map(key_rank)
    }

    /// Ranks in ascending order, each paired with its vertex set.
    pub fn ranks(&self) -> impl Iterator<Item = (f64, &[String])> {
        self.rank_vertices
            .iter()
            .map(|(&k, vs)| (key_rank(k), vs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_idempotent_and_moves_between_ranks() {
        let mut t = RankTable::new();
        t.set("a", 0.0);
        t.set("a", 1.0);
        assert_eq!(t.rank("a"), Some(1.0));
        assert_eq!(t.nodes(0.0), &[] as &[String]);
        assert_eq!(t.nodes(1.0), &["a".to_string()]);
    }

    #[test]
    fn supports_half_integer_ranks() {
        let mut t = RankTable::new();
        t.set("a", 0.0);
        t.set("sink", 0.5);
        t.set("b", 1.0);
        assert_eq!(t.rank("sink"), Some(0.5));
        assert_eq!(t.min_rank(), Some(0.0));
        assert_eq!(t.max_rank(), Some(1.0));
    }

    #[test]
    fn delete_prunes_empty_rank_sets() {
        let mut t = RankTable::new();
        t.set("a", 2.0);
        t.delete("a");
        assert_eq!(t.max_rank(), None);
    }
}
