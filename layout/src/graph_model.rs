//! Argument-map extensions to the plain directed compound graph: conjunct vertices and warrant
//! edges. These run against the caller's own graph *before* [`crate::layout`] copies it.

use crate::error::{LayoutError, Result};
use crate::model::{LayoutGraph, Vertex};

fn conjunct_container_id(w: &str) -> String {
    format!("-> {w}")
}

pub fn warrant_sink_id(u: &str, w: &str) -> String {
    format!("{u} -> {w}")
}

/// `setConjunctNode(v, edge=(u,w))`: reparents `u` and `v` under a shared container with a
/// single outgoing edge to `w`, synthesizing the container and reparenting it if this is the
/// first child pair for `w`, or reusing the existing one if a container aimed at `w` already
/// exists.
pub fn set_conjunct_node(g: &mut LayoutGraph, v: &str, u: &str, w: &str) -> Result<()> {
    if !g.has_node(w) {
        return Err(LayoutError::InvalidInput(format!(
            "setConjunctNode: target vertex {w:?} does not exist"
        )));
    }

    let container = conjunct_container_id(w);
    if !g.has_node(&container) || !g.has_edge(&container, w, None) {
        g.ensure_node(container.clone());
        if let Some(label) = g.node_mut(&container) {
            label.is_conjunct_node = true;
            label.width = 0.0;
            label.height = 0.0;
        }
        g.set_edge(container.clone(), w.to_string());
    }

    if let Some(existing_edge) = g.edge(u, w, None).cloned() {
        g.remove_edge(u, w, None);
        g.set_edge_with_label(container.clone(), w.to_string(), existing_edge);
    }

    g.ensure_node(u.to_string());
    g.ensure_node(v.to_string());
    g.set_parent(u, &container);
    g.set_parent(v, &container);

    Ok(())
}

/// `setWarrantEdge(s, edge=(u,w), label)`: creates or updates the warrant-sink vertex `"u -> w"`
/// and ensures an edge `s -> sink` carrying `label`.
pub fn set_warrant_edge(
    g: &mut LayoutGraph,
    s: &str,
    u: &str,
    w: &str,
    label: crate::model::Edge,
) -> Result<()> {
    if !g.has_node(u) || !g.has_node(w) {
        return Err(LayoutError::InvalidInput(format!(
            "setWarrantEdge: edge ({u:?}, {w:?}) does not exist"
        )));
    }

    let sink = warrant_sink_id(u, w);
    g.ensure_node(sink.clone());
    if let Some(vertex) = g.node_mut(&sink) {
        vertex.is_warrant_sink = true;
        vertex.width = 0.0;
        vertex.height = 0.0;
    }

    g.ensure_node(s.to_string());
    g.set_edge_with_label(s.to_string(), sink, label);
    Ok(())
}

/// `removeEdge`: drops an edge, cleaning up conjunct containers and warrant sinks it orphans.
pub fn remove_edge(g: &mut LayoutGraph, v: &str, w: &str) {
    g.remove_edge(v, w, None);

    if g
        .node(v)
        .map(|n: &Vertex| n.is_conjunct_node)
        .unwrap_or(false)
        && g.children(v).is_empty()
    {
        g.remove_node(v);
    }

    if g
        .node(w)
        .map(|n: &Vertex| n.is_warrant_sink)
        .unwrap_or(false)
    {
        g.remove_node(w);
    }

    let maybe_sink = warrant_sink_id(v, w);
    if g.has_node(&maybe_sink) {
        g.remove_node(&maybe_sink);
    }
}
