//! The core `Graph` container plus a small set of traversal/cycle-detection algorithms,
//! re-exported as `argraph::alg`.

pub mod alg;
mod core;
mod edge_key;
mod entries;
mod options;

pub use core::Graph;
pub use edge_key::EdgeKey;
pub use options::GraphOptions;
