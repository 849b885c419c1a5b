//! Vertex/edge label types and geometry primitives for the argument-map layout graph.
//!
//! One flat struct per entity (input + output + scratch together) rather than three generic type
//! parameters: callers read and write the same [`Vertex`]/[`Edge`] the engine uses internally, and
//! simply ignore the scratch fields between calls to [`crate::layout`].

use argraph::EdgeKey;

/// Recognized layout configuration, mirroring the table in the crate's top-level docs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub ranksep: f64,
    pub nodesep: f64,
    pub max_ranking_loops: usize,
    pub max_crossing_loops: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ranksep: 225.0,
            nodesep: 100.0,
            max_ranking_loops: 100,
            max_crossing_loops: 100,
        }
    }
}

/// Graph-level scratch shared by the whole pipeline (wraps [`LayoutConfig`] plus per-call state).
#[derive(Debug, Clone, Default)]
pub struct GraphLabel {
    pub ranksep: f64,
    pub nodesep: f64,
    pub max_ranking_loops: usize,
    pub max_crossing_loops: usize,
    pub dummy_chains: Vec<String>,
}

impl From<LayoutConfig> for GraphLabel {
    fn from(c: LayoutConfig) -> Self {
        Self {
            ranksep: c.ranksep,
            nodesep: c.nodesep,
            max_ranking_loops: c.max_ranking_loops,
            max_crossing_loops: c.max_crossing_loops,
            dummy_chains: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// What kind of dummy a synthesized vertex stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyKind {
    /// One hop of a long edge's chain.
    Edge,
    /// A constraint-graph sentinel bounding a conjunct container's children.
    ConjunctSentinel,
    /// A constraint-graph sentinel bounding a warrant's adjacent ranks.
    WarrantSentinel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    // -- input --
    pub width: f64,
    pub height: f64,

    // -- output --
    pub x: Option<f64>,
    pub y: Option<f64>,

    // -- scratch: layering --
    pub rank: Option<f64>,

    // -- scratch: ordering --
    pub order: Option<usize>,

    // -- flags --
    pub dummy: Option<DummyKind>,
    pub is_conjunct_node: bool,
    pub is_conjunct_dummy_node: bool,
    pub is_warrant_sink: bool,

    /// Set on a conjunct container: the children stashed during pre-merge, restored afterward.
    pub conjunct_children: Vec<String>,
    /// Set on a dummy standing in for one hop of a long edge: the original edge it represents.
    pub dummy_edge: Option<EdgeKey>,
    /// Set alongside `dummy_edge`: the original edge's weight, carried forward so the router can
    /// restore it onto the collapsed edge.
    pub dummy_edge_weight: Option<f64>,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 100.0,
            x: None,
            y: None,
            rank: None,
            order: None,
            dummy: None,
            is_conjunct_node: false,
            is_conjunct_dummy_node: false,
            is_warrant_sink: false,
            conjunct_children: Vec::new(),
            dummy_edge: None,
            dummy_edge_weight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    // -- input --
    pub minlen: usize,
    pub weight: f64,

    // -- output --
    pub points: Vec<Point>,
}

impl Default for Edge {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            points: Vec::new(),
        }
    }
}

pub type LayoutGraph = argraph::Graph<Vertex, Edge, GraphLabel>;
