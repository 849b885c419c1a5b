//! Layered (Sugiyama-style) graph layout for argument maps.
//!
//! Given a directed graph of statements and inferences, [`layout`] assigns each vertex a 2D
//! position and each edge a three-point quadratic Bézier polyline. Two argument-map extensions
//! sit on top of the plain directed compound graph: conjunct vertices (premises that jointly
//! imply a shared conclusion, drawn as one contiguous block) and warrant edges (an edge whose
//! target is another edge, via a synthetic warrant-sink vertex at a half-integer rank).

mod cycle;
mod error;
mod graph_model;
mod greedy_fas;
mod model;
mod order;
mod position;
mod rank;
mod rank_table;
mod router;

pub use error::{LayoutError, Result};
pub use graph_model::{remove_edge, set_conjunct_node, set_warrant_edge, warrant_sink_id};
pub use model::{DummyKind, Edge, GraphLabel, LayoutConfig, Point, Vertex};

/// The engine's directed compound graph, parameterized with this crate's [`Vertex`]/[`Edge`]
/// labels. Callers build one, populate it via `argraph::Graph`'s own API plus [`set_conjunct_node`]
/// and [`set_warrant_edge`], then pass it to [`layout`].
pub type Graph = model::LayoutGraph;

/// Outcome of a `layout()` call: whether either iteration cap fired, and the overall bounding
/// size of the laid-out diagram (computed from the final vertex positions and sizes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutReport {
    pub ranking_cap_reached: bool,
    pub crossing_cap_reached: bool,
    pub width: f64,
    pub height: f64,
}

/// Runs the full pipeline in place: cycle removal, layering, crossing minimization, coordinate
/// assignment, routing, then writes `x`/`y`/`points` back onto `g` and restores the edges cycle
/// removal reversed or deleted.
///
/// Returns [`LayoutError::InvalidInput`] if `g` is not a directed graph (a multigraph or an
/// undirected graph configured via `argraph::GraphOptions`).
pub fn layout(g: &mut Graph, config: LayoutConfig) -> Result<LayoutReport> {
    if g.options().multigraph {
        return Err(LayoutError::InvalidInput(
            "arglayout requires a non-multigraph directed graph".to_string(),
        ));
    }
    if !g.is_directed() {
        return Err(LayoutError::InvalidInput(
            "arglayout requires a directed graph".to_string(),
        ));
    }

    let span = tracing::info_span!("arglayout::layout", vertices = g.node_count());
    let _enter = span.enter();

    g.set_graph(GraphLabel::from(config));

    let cycle_result = {
        let _span = tracing::info_span!("cycle_removal").entered();
        cycle::remove_cycles(g)
    };

    let ranking_outcome = {
        let _span = tracing::info_span!("layering").entered();
        let outcome = rank::assign_ranks(g, config.max_ranking_loops);
        if outcome.cap_reached {
            tracing::warn!(
                vertices = g.node_count(),
                cap = config.max_ranking_loops,
                "layering hit its iteration cap"
            );
        }
        outcome
    };

    let ordering_outcome = {
        let _span = tracing::info_span!("ordering").entered();
        let outcome = order::order(g, config.max_crossing_loops);
        if outcome.cap_reached {
            tracing::warn!(
                vertices = g.node_count(),
                cap = config.max_crossing_loops,
                "crossing minimization hit its iteration cap"
            );
        }
        outcome
    };

    {
        let _span = tracing::info_span!("positioning").entered();
        position::assign_positions(g);
    }

    {
        let _span = tracing::info_span!("routing").entered();
        router::route(g);
        cycle::restore_cycles(g, &cycle_result);
    }

    let (width, height) = bounding_size(g);

    Ok(LayoutReport {
        ranking_cap_reached: ranking_outcome.cap_reached,
        crossing_cap_reached: ordering_outcome.cap_reached,
        width,
        height,
    })
}

fn bounding_size(g: &Graph) -> (f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for v in g.node_ids() {
        let Some(n) = g.node(&v) else { continue };
        let (Some(x), Some(y)) = (n.x, n.y) else { continue };
        min_x = min_x.min(x - n.width / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    }

    if !max_x.is_finite() {
        return (0.0, 0.0);
    }
    (max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argraph::GraphOptions;

    fn graph() -> Graph {
        Graph::new(GraphOptions::default())
    }

    #[test]
    fn empty_graph_returns_without_error() {
        let mut g = graph();
        let report = layout(&mut g, LayoutConfig::default()).unwrap();
        assert_eq!(report.width, 0.0);
        assert_eq!(report.height, 0.0);
    }

    #[test]
    fn single_vertex_lands_at_origin() {
        let mut g = graph();
        g.ensure_node("a");
        layout(&mut g, LayoutConfig::default()).unwrap();
        let a = g.node("a").unwrap();
        assert_eq!(a.x, Some(0.0));
        assert_eq!(a.y, Some(0.0));
    }

    #[test]
    fn simple_chain_ranks_in_order_with_one_straight_column() {
        let mut g = graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");

        layout(&mut g, LayoutConfig::default()).unwrap();

        assert_eq!(g.node("a").unwrap().rank, Some(0.0));
        assert_eq!(g.node("b").unwrap().rank, Some(1.0));
        assert_eq!(g.node("c").unwrap().rank, Some(2.0));

        let xa = g.node("a").unwrap().x.unwrap();
        let xb = g.node("b").unwrap().x.unwrap();
        let xc = g.node("c").unwrap().x.unwrap();
        assert!((xa - xb).abs() < 1e-6);
        assert!((xb - xc).abs() < 1e-6);
    }

    #[test]
    fn multigraph_input_is_rejected() {
        let mut g = Graph::new(GraphOptions {
            multigraph: true,
            ..Default::default()
        });
        g.ensure_node("a");
        let err = layout(&mut g, LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput(_)));
    }

    #[test]
    fn undirected_input_is_rejected() {
        let mut g = Graph::new(GraphOptions {
            directed: false,
            ..Default::default()
        });
        g.ensure_node("a");
        let err = layout(&mut g, LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput(_)));
    }

    #[test]
    fn cycle_is_restored_after_routing() {
        let mut g = graph();
        g.set_edge("a", "b");
        g.set_edge("b", "c");
        g.set_edge("c", "a");

        layout(&mut g, LayoutConfig::default()).unwrap();

        assert!(g.has_edge("a", "b", None));
        assert!(g.has_edge("b", "c", None));
        assert!(g.has_edge("c", "a", None));
        for key in g.edge_keys() {
            let e = g.edge_by_key(&key).unwrap();
            assert_eq!(e.points.len(), 3);
        }
    }
}
