use thiserror::Error;

use crate::graph::VertexId;

/// Failures of graph construction and of solving.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The graph handed to the builder is not a well-formed game.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] InvalidGraph),

    /// The recursive solver went deeper than its configured cap.
    #[error("maximum recursion depth exceeded: {limit}")]
    RecursionLimitExceeded { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidGraph {
    #[error("edge endpoint {0:?} is not a vertex of the graph")]
    UnknownVertex(VertexId),

    #[error("duplicate edge from {from:?} to {to:?}")]
    DuplicateEdge { from: VertexId, to: VertexId },

    #[error("vertex {0:?} has no successors")]
    DeadEnd(VertexId),
}

pub type Result<T> = std::result::Result<T, Error>;
