//! Error types for graph construction and queries.

use thiserror::Error;

/// Failures reported by the graph model and the routing algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("duplicate node: {0}")]
    DuplicateNode(String),
    #[error("self loop on node: {0}")]
    SelfLoop(String),
    #[error("invalid weight {weight} on edge {from} - {to}")]
    InvalidWeight { from: String, to: String, weight: f64 },
    #[error("no path from {from} to {to}")]
    NoPath { from: String, to: String },
    #[error("tour needs at least one node")]
    EmptyTour,
    #[error("no edge between {from} and {to}")]
    MissingEdge { from: String, to: String },
    #[error("query cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub fn unknown_node(label: impl Into<String>) -> Self {
        Self::UnknownNode(label.into())
    }

    pub fn no_path(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::NoPath {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Failures while reading or writing a graph file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid graph file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
