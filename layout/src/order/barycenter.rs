//! Barycenter computation and constraint-violation resolution.
//!
//! No recursive subgraph border-node handling: this engine's only subgraph-like structure
//! (conjunct containers) is expressed as ordinary constraint-graph edges over sentinel vertices,
//! not as nested layers to sort independently.

use super::constraints::ConstraintGraph;
use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Neighbors live on the fixed rank *above* (use in-edges).
    Down,
    /// Neighbors live on the fixed rank *below* (use out-edges).
    Up,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Mean order of each movable vertex's neighbors on the fixed, already-ordered adjacent rank.
pub fn barycenter(
    g: &LayoutGraph,
    movable: &[String],
    direction: SweepDirection,
) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            let mut saw_edge = false;

            let edges = match direction {
                SweepDirection::Down => g.in_edges(v, None),
                SweepDirection::Up => g.out_edges(v, None),
            };
            for key in edges {
                let neighbor = match direction {
                    SweepDirection::Down => &key.v,
                    SweepDirection::Up => &key.w,
                };
                let Some(order) = g.node(neighbor).and_then(|n| n.order) else {
                    continue;
                };
                let w = g.edge_by_key(&key).map(|e| e.weight).unwrap_or(1.0);
                sum += w * order as f64;
                weight += w;
                saw_edge = true;
            }

            if !saw_edge {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                }
            } else {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: Some(sum / weight),
                    weight: Some(weight),
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
struct ConflictEntry {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<usize>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

/// Merges vertices connected by a violated constraint-graph edge into a single meta-vertex,
/// processing the constraint DAG topologically so merges never need to be undone.
pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<SortEntry> {
    let mut id_to_ix: HashMap<&str, usize> = HashMap::default();
    let mut conflicts: Vec<ConflictEntry> = Vec::with_capacity(entries.len());
    for (ix, entry) in entries.iter().enumerate() {
        id_to_ix.insert(entry.v.as_str(), ix);
        conflicts.push(ConflictEntry {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![ix],
            i: ix,
            barycenter: entry.barycenter,
            weight: entry.weight,
            merged: false,
        });
    }

    for e in cg.edges() {
        let Some(&v_ix) = id_to_ix.get(e.v.as_str()) else {
            continue;
        };
        let Some(&w_ix) = id_to_ix.get(e.w.as_str()) else {
            continue;
        };
        conflicts[w_ix].indegree += 1;
        conflicts[v_ix].outs.push(w_ix);
    }

    let mut source_set: Vec<usize> = (0..conflicts.len())
        .filter(|&ix| conflicts[ix].indegree == 0)
        .collect();

    let mut processed: Vec<usize> = Vec::new();
    while let Some(v_ix) = source_set.pop() {
        processed.push(v_ix);

        let ins = std::mem::take(&mut conflicts[v_ix].ins);
        for u in ins.into_iter().rev() {
            if conflicts[u].merged {
                continue;
            }
            let should_merge = match (conflicts[u].barycenter, conflicts[v_ix].barycenter) {
                (None, _) | (_, None) => true,
                (Some(ub), Some(vb)) => ub >= vb,
            };
            if should_merge {
                merge_conflict_entries(&mut conflicts, v_ix, u);
            }
        }

        let outs = std::mem::take(&mut conflicts[v_ix].outs);
        for w_ix in outs {
            conflicts[w_ix].ins.push(v_ix);
            conflicts[w_ix].indegree = conflicts[w_ix].indegree.saturating_sub(1);
            if conflicts[w_ix].indegree == 0 {
                source_set.push(w_ix);
            }
        }
    }

    let mut out = Vec::new();
    for id in processed {
        let entry = &conflicts[id];
        if entry.merged {
            continue;
        }
        let vs = entry.vs.iter().map(|&ix| entries[ix].v.clone()).collect();
        out.push(SortEntry {
            vs,
            i: entry.i,
            barycenter: entry.barycenter,
            weight: entry.weight,
        });
    }
    out
}

fn merge_conflict_entries(mapped: &mut [ConflictEntry], target: usize, source: usize) {
    if target == source {
        return;
    }
    let (t, s) = if target < source {
        let (left, right) = mapped.split_at_mut(source);
        (&mut left[target], &mut right[0])
    } else {
        let (left, right) = mapped.split_at_mut(target);
        (&mut right[0], &mut left[source])
    };

    let mut sum = 0.0;
    let mut weight = 0.0;
    if let (Some(b), Some(w)) = (t.barycenter, t.weight) {
        if w != 0.0 {
            sum += b * w;
            weight += w;
        }
    }
    if let (Some(b), Some(w)) = (s.barycenter, s.weight) {
        if w != 0.0 {
            sum += b * w;
            weight += w;
        }
    }

    let source_vs = std::mem::take(&mut s.vs);
    let target_vs = std::mem::take(&mut t.vs);
    let mut merged_vs = Vec::with_capacity(source_vs.len() + target_vs.len());
    merged_vs.extend(source_vs);
    merged_vs.extend(target_vs);
    t.vs = merged_vs;

    if weight != 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    }
    t.i = t.i.min(s.i);
    s.merged = true;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
}

/// Final order: sortable (meta-)vertices by barycenter (ties broken by original index, direction
/// controlled by `bias_right`), with unsortable (isolated) vertices left pinned at their original
/// position.
pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let mut sortable: Vec<usize> = Vec::new();
    let mut unsortable: Vec<usize> = Vec::new();
    for (ix, entry) in entries.iter().enumerate() {
        if entry.barycenter.is_some() {
            sortable.push(ix);
        } else {
            unsortable.push(ix);
        }
    }

    unsortable.sort_by(|&a, &b| entries[b].i.cmp(&entries[a].i));

    sortable.sort_by(|&a, &b| {
        let a_bc = entries[a].barycenter.unwrap_or(0.0);
        let b_bc = entries[b].barycenter.unwrap_or(0.0);
        a_bc.partial_cmp(&b_bc).unwrap().then_with(|| {
            if !bias_right {
                entries[a].i.cmp(&entries[b].i)
            } else {
                entries[b].i.cmp(&entries[a].i)
            }
        })
    });

    let mut out = Vec::new();
    let mut index = 0usize;

    fn consume_unsortable(
        out: &mut Vec<String>,
        entries: &[SortEntry],
        unsortable: &mut Vec<usize>,
        mut index: usize,
    ) -> usize {
        while let Some(&last_ix) = unsortable.last() {
            if entries[last_ix].i > index {
                break;
            }
            unsortable.pop();
            out.extend(entries[last_ix].vs.iter().cloned());
            index += 1;
        }
        index
    }

    index = consume_unsortable(&mut out, entries, &mut unsortable, index);
    for ix in sortable {
        let entry = &entries[ix];
        index += entry.vs.len();
        out.extend(entry.vs.iter().cloned());
        index = consume_unsortable(&mut out, entries, &mut unsortable, index);
    }

    SortResult { vs: out }
}
