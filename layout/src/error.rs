//! Error types surfaced by [`crate::layout`].

use thiserror::Error;

/// Failure modes for a single [`crate::layout`] call.
///
/// `IterationCapReached` is deliberately absent here: hitting a loop cap is not a failure, it is
/// reported back on [`crate::LayoutReport`] instead.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The caller's graph (or an argument-map extension call) violated an input precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant the algorithm depends on did not hold. Reaching this means a bug in
    /// the engine, not a malformed caller graph; it is still returned rather than panicking so an
    /// embedding renderer cannot be brought down by a layout call.
    #[error("internal invariant violated: {0}")]
    Unreachable(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
