//! The core `Graph` container: arena-indexed nodes and edges with O(1) id lookup.
//!
//! Indices are stable for the lifetime of a node/edge: removal tombstones the slot rather than
//! shifting later entries, so callers that cache a `usize` index (e.g. the ranking and ordering
//! passes) never observe it silently pointing at an unrelated entry.

use super::edge_key::{EdgeKey, EdgeKeyView};
use super::entries::{EdgeEntry, NodeEntry};
use super::options::GraphOptions;
use hashbrown::HashMap;
use std::rc::Rc;

pub struct Graph<N, E, G> {
    options: GraphOptions,
    graph_label: G,
    nodes: Vec<Option<NodeEntry<N>>>,
    node_live: usize,
    node_index: HashMap<String, usize>,
    edges: Vec<Option<EdgeEntry<E>>>,
    edge_live: usize,
    edge_index: HashMap<EdgeKey, usize>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    default_node_label: Option<Rc<dyn Fn() -> N>>,
    default_edge_label: Option<Rc<dyn Fn() -> E>>,
}

impl<N, E, G> Clone for Graph<N, E, G>
where
    N: Clone,
    E: Clone,
    G: Clone,
{
    fn clone(&self) -> Self {
        Graph {
            options: self.options,
            graph_label: self.graph_label.clone(),
            nodes: self.nodes.clone(),
            node_live: self.node_live,
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            edge_live: self.edge_live,
            edge_index: self.edge_index.clone(),
            out_adj: self.out_adj.clone(),
            in_adj: self.in_adj.clone(),
            parent: self.parent.clone(),
            children: self.children.clone(),
            default_node_label: self.default_node_label.clone(),
            default_edge_label: self.default_edge_label.clone(),
        }
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Graph {
            options,
            graph_label: G::default(),
            nodes: Vec::new(),
            node_live: 0,
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_live: 0,
            edge_index: HashMap::new(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
            parent: Vec::new(),
            children: Vec::new(),
            default_node_label: None,
            default_edge_label: None,
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn set_default_node_label(&mut self, f: impl Fn() -> N + 'static) -> &mut Self {
        self.default_node_label = Some(Rc::new(f));
        self
    }

    pub fn set_default_edge_label(&mut self, f: impl Fn() -> E + 'static) -> &mut Self {
        self.default_edge_label = Some(Rc::new(f));
        self
    }

    fn new_node_label(&self) -> N {
        self.default_node_label
            .as_ref()
            .map(|f| f())
            .unwrap_or_default()
    }

    fn new_edge_label(&self) -> E {
        self.default_edge_label
            .as_ref()
            .map(|f| f())
            .unwrap_or_default()
    }

    // -- Nodes ----------------------------------------------------------

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.nodes[ix] = Some(NodeEntry { id, label });
            return self;
        }
        let ix = self.nodes.len();
        self.node_index.insert(id.clone(), ix);
        self.nodes.push(Some(NodeEntry { id, label }));
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        self.parent.push(None);
        self.children.push(Vec::new());
        self.node_live += 1;
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.has_node(&id) {
            let label = self.new_node_label();
            self.set_node(id, label);
        }
        self
    }

    fn ensure_node_ix(&mut self, id: &str) -> usize {
        if let Some(&ix) = self.node_index.get(id) {
            return ix;
        }
        let label = self.new_node_label();
        self.set_node(id.to_string(), label);
        self.node_index[id]
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        let &ix = self.node_index.get(id)?;
        self.nodes[ix].as_ref().map(|e| &e.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let &ix = self.node_index.get(id)?;
        self.nodes[ix].as_mut().map(|e| &mut e.label)
    }

    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let ix = self.node_index.remove(id)?;
        let entry = self.nodes[ix].take()?;
        self.node_live -= 1;

        for eix in std::mem::take(&mut self.out_adj[ix]) {
            self.remove_edge_by_ix(eix);
        }
        for eix in std::mem::take(&mut self.in_adj[ix]) {
            self.remove_edge_by_ix(eix);
        }

        if let Some(p_ix) = self.parent[ix].take() {
            self.children[p_ix].retain(|&c| c != ix);
        }
        for c_ix in std::mem::take(&mut self.children[ix]) {
            self.parent[c_ix] = None;
        }

        Some(entry.label)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|e| e.as_ref().map(|e| e.id.clone()))
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|e| e.as_ref().map(|e| e.id.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.node_live
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id_by_ix(&self, ix: usize) -> Option<&str> {
        self.nodes.get(ix)?.as_ref().map(|e| e.id.as_str())
    }

    pub fn node_label_by_ix(&self, ix: usize) -> Option<&N> {
        self.nodes.get(ix)?.as_ref().map(|e| &e.label)
    }

    pub fn node_label_mut_by_ix(&mut self, ix: usize) -> Option<&mut N> {
        self.nodes.get_mut(ix)?.as_mut().map(|e| &mut e.label)
    }

    pub fn for_each_node(&self, mut f: impl FnMut(&str, &N)) {
        for e in self.nodes.iter().flatten() {
            f(&e.id, &e.label);
        }
    }

    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(&str, &mut N)) {
        for e in self.nodes.iter_mut().flatten() {
            f(&e.id, &mut e.label);
        }
    }

    pub fn for_each_node_ix(&self, mut f: impl FnMut(usize, &str, &N)) {
        for (ix, e) in self.nodes.iter().enumerate() {
            if let Some(e) = e {
                f(ix, &e.id, &e.label);
            }
        }
    }

    // -- Edges ------------------------------------------------------------

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        let label = self.new_edge_label();
        self.set_edge_named(v.into(), w.into(), None::<String>, Some(label))
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v.into(), w.into(), None::<String>, Some(label))
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.upsert_edge(key, label)
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = EdgeKey::new(v, w, name);
        let label = label.unwrap_or_else(|| self.new_edge_label());
        self.upsert_edge(key, label)
    }

    pub fn set_path(&mut self, path: &[&str]) -> &mut Self {
        for pair in path.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    fn upsert_edge(&mut self, key: EdgeKey, label: E) -> &mut Self {
        let v_ix = self.ensure_node_ix(&key.v);
        let w_ix = self.ensure_node_ix(&key.w);
        if let Some(&ix) = self.edge_index.get(&key) {
            self.edges[ix] = Some(EdgeEntry {
                key,
                v_ix,
                w_ix,
                label,
            });
            return self;
        }
        let ix = self.edges.len();
        self.edge_index.insert(key.clone(), ix);
        self.edges.push(Some(EdgeEntry {
            key,
            v_ix,
            w_ix,
            label,
        }));
        self.out_adj[v_ix].push(ix);
        self.in_adj[w_ix].push(ix);
        self.edge_live += 1;
        self
    }

    fn remove_edge_by_ix(&mut self, ix: usize) -> Option<E> {
        let entry = self.edges.get_mut(ix)?.take()?;
        self.edge_index.remove(&entry.key);
        self.out_adj[entry.v_ix].retain(|&e| e != ix);
        self.in_adj[entry.w_ix].retain(|&e| e != ix);
        self.edge_live -= 1;
        Some(entry.label)
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&EdgeKeyView { v, w, name })
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let &ix = self.edge_index.get(&EdgeKeyView { v, w, name })?;
        self.edges[ix].as_ref().map(|e| &e.label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let &ix = self.edge_index.get(&EdgeKeyView { v, w, name })?;
        self.edges[ix].as_mut().map(|e| &mut e.label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_by_endpoints_ix(&self, v_ix: usize, w_ix: usize) -> Option<&E> {
        self.out_adj.get(v_ix)?.iter().find_map(|&eix| {
            let e = self.edges[eix].as_ref()?;
            (e.w_ix == w_ix).then_some(&e.label)
        })
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let &ix = self.edge_index.get(&EdgeKeyView { v, w, name })?;
        self.remove_edge_by_ix(ix)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().filter_map(|e| e.as_ref().map(|e| &e.key))
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges().cloned().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_live
    }

    pub fn for_each_edge(&self, mut f: impl FnMut(&EdgeKey, &E)) {
        for e in self.edges.iter().flatten() {
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_edge_mut(&mut self, mut f: impl FnMut(&EdgeKey, &mut E)) {
        for e in self.edges.iter_mut().flatten() {
            f(&e.key, &mut e.label);
        }
    }

    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(&ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.in_adj[ix]
            .iter()
            .filter_map(|&eix| {
                let e = self.edges[eix].as_ref()?;
                if u.is_some_and(|u| e.key.v != u) {
                    return None;
                }
                Some(e.key.clone())
            })
            .collect()
    }

    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(&ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.out_adj[ix]
            .iter()
            .filter_map(|&eix| {
                let e = self.edges[eix].as_ref()?;
                if w.is_some_and(|w| e.key.w != w) {
                    return None;
                }
                Some(e.key.clone())
            })
            .collect()
    }

    pub fn for_each_in_edge(&self, v: &str, u: Option<&str>, mut f: impl FnMut(&EdgeKey, &E)) {
        let Some(&ix) = self.node_index.get(v) else {
            return;
        };
        for &eix in &self.in_adj[ix] {
            let Some(e) = self.edges[eix].as_ref() else {
                continue;
            };
            if u.is_some_and(|u| e.key.v != u) {
                continue;
            }
            f(&e.key, &e.label);
        }
    }

    pub fn for_each_out_edge(&self, v: &str, w: Option<&str>, mut f: impl FnMut(&EdgeKey, &E)) {
        let Some(&ix) = self.node_index.get(v) else {
            return;
        };
        for &eix in &self.out_adj[ix] {
            let Some(e) = self.edges[eix].as_ref() else {
                continue;
            };
            if w.is_some_and(|w| e.key.w != w) {
                continue;
            }
            f(&e.key, &e.label);
        }
    }

    // -- Neighbor queries ---------------------------------------------------

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.out_adj[ix]
            .iter()
            .filter_map(|&eix| self.edges[eix].as_ref())
            .map(|e| e.key.w.as_str())
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.in_adj[ix]
            .iter()
            .filter_map(|&eix| self.edges[eix].as_ref())
            .map(|e| e.key.v.as_str())
            .collect()
    }

    pub fn first_predecessor(&self, v: &str) -> Option<&str> {
        self.predecessors(v).into_iter().next()
    }

    pub fn first_successor(&self, v: &str) -> Option<&str> {
        self.successors(v).into_iter().next()
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out = self.successors(v);
        for p in self.predecessors(v) {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }

    pub fn sources(&self) -> Vec<&str> {
        let Some(ids) = Some(&self.nodes) else {
            return Vec::new();
        };
        ids.iter()
            .enumerate()
            .filter_map(|(ix, e)| {
                let e = e.as_ref()?;
                self.in_adj[ix].is_empty().then_some(e.id.as_str())
            })
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(ix, e)| {
                let e = e.as_ref()?;
                self.out_adj[ix].is_empty().then_some(e.id.as_str())
            })
            .collect()
    }

    // -- Compound parent/children ------------------------------------------

    pub fn parent(&self, v: &str) -> Option<&str> {
        let &ix = self.node_index.get(v)?;
        let p_ix = self.parent[ix]?;
        self.nodes[p_ix].as_ref().map(|e| e.id.as_str())
    }

    pub fn set_parent(&mut self, v: &str, parent: &str) -> &mut Self {
        self.ensure_node_ix(parent);
        let Some(&v_ix) = self.node_index.get(v) else {
            return self;
        };
        self.clear_parent(v);
        let p_ix = self.node_index[parent];
        self.parent[v_ix] = Some(p_ix);
        self.children[p_ix].push(v_ix);
        self
    }

    pub fn clear_parent(&mut self, v: &str) -> &mut Self {
        if let Some(&v_ix) = self.node_index.get(v) {
            if let Some(p_ix) = self.parent[v_ix].take() {
                self.children[p_ix].retain(|&c| c != v_ix);
            }
        }
        self
    }

    /// Children of `v`, or top-level (parentless) vertices if `v` is empty.
    pub fn children(&self, v: &str) -> Vec<&str> {
        if v.is_empty() {
            return self
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(ix, e)| {
                    let e = e.as_ref()?;
                    self.parent[ix].is_none().then_some(e.id.as_str())
                })
                .collect();
        }
        let Some(&ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.children[ix]
            .iter()
            .filter_map(|&cix| self.nodes[cix].as_ref())
            .map(|e| e.id.as_str())
            .collect()
    }
}
