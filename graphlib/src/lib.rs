//! Arena-indexed directed (and optionally compound/multigraph) graph container.

mod graph;

pub use graph::alg;
pub use graph::{EdgeKey, Graph, GraphOptions};
