//! Error types for graph construction and the numerical pipeline.
//!
//! Structural errors ([`InvalidGraphError`]) are raised before any numeric
//! work starts; invariant violations ([`NumericalInvariantError`]) indicate a
//! construction bug and are never silently corrected. Power-iteration
//! non-convergence is deliberately *not* an error, see
//! [`CentralityStatus`](crate::centrality::CentralityStatus).

use std::fmt::Debug;

use thiserror::Error;

/// Malformed input topology. Fatal: the scorer never runs on an inconsistent
/// graph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidGraphError<T: Debug> {
    /// The node table is empty.
    #[error("graph has no nodes")]
    Empty,

    /// The same identifier appears twice in the node table.
    #[error("duplicate node id {0:?}")]
    DuplicateNode(T),

    /// An edge references an identifier missing from the node table.
    #[error("edge ({source:?}, {target:?}) references unknown node {node:?}")]
    UnknownNode {
        /// The identifier that could not be resolved.
        node: T,
        /// First endpoint of the offending edge.
        source: T,
        /// Second endpoint of the offending edge.
        target: T,
    },

    /// An edge connects a node to itself.
    #[error("self-loop on node {0:?}")]
    SelfLoop(T),

    /// The same unordered node pair appears twice in the edge table.
    /// Duplicates are rejected rather than deduplicated so that two runs over
    /// the same input can never disagree about the edge count.
    #[error("duplicate edge between {0:?} and {1:?}")]
    DuplicateEdge(T, T),
}

/// A numerical invariant that must hold by construction was violated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NumericalInvariantError {
    /// The smallest Laplacian eigenvalue is not zero within tolerance. For
    /// any undirected graph L = D - A is positive semi-definite with a zero
    /// ground eigenvalue, so a violation means the matrices are inconsistent.
    #[error(
        "smallest Laplacian eigenvalue {lambda1:e} exceeds the zero tolerance {tolerance:e}"
    )]
    GroundEigenvalue {
        /// The computed smallest eigenvalue.
        lambda1: f64,
        /// The absolute tolerance it was checked against.
        tolerance: f64,
    },

    /// A weight set does not sum to one.
    #[error("{context} weights sum to {sum}, expected 1.0")]
    WeightSum {
        /// Which weight set is mis-configured.
        context: &'static str,
        /// The offending sum.
        sum: f64,
    },
}

/// Umbrella error for running the full pipeline over freshly built input.
#[derive(Debug, Error)]
pub enum AnalysisError<T: Debug> {
    #[error(transparent)]
    InvalidGraph(#[from] InvalidGraphError<T>),

    #[error(transparent)]
    NumericalInvariant(#[from] NumericalInvariantError),
}
