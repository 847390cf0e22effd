//! Path and tour results.
//!
//! Both are plain values owned by the caller: a node sequence plus the cost
//! recomputed from the graph it was produced on.

use crate::error::Result;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// A walk through the graph between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Node labels from source to target
    pub nodes: Vec<String>,
    /// Sum of the traversed edge weights
    pub cost: f64,
}

impl Path {
    /// Build a path from node indices, recomputing its cost on `graph`.
    pub(crate) fn from_ids(graph: &Graph, ids: &[usize]) -> Result<Self> {
        let cost = graph.walk_cost_ids(ids)?;
        Ok(Path {
            nodes: ids.iter().map(|&id| graph.label(id).to_string()).collect(),
            cost,
        })
    }

    pub fn source(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    pub fn target(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Consecutive node pairs along the path.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.nodes
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (cost {:.2})", self.nodes.join(" -> "), self.cost)
    }
}

/// An approximate travelling-salesman walk over a set of target nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// The walk in the original graph. Closed tours repeat the first node at the end.
    pub path: Path,
    /// Target nodes in tour order over the metric closure. A target may
    /// already appear earlier in `path` as an intermediate node of another leg.
    pub visit_order: Vec<String>,
    /// Whether the walk returns to its starting node
    pub closed: bool,
    /// Heuristic that produced the initial cycle
    pub construction: String,
    /// Whether local search changed the initial cycle
    pub improved: bool,
}

impl Tour {
    pub fn nodes(&self) -> &[String] {
        &self.path.nodes
    }

    pub fn cost(&self) -> f64 {
        self.path.cost
    }

    /// Tour cost converted to money at `rate` per unit of distance.
    pub fn price(&self, rate: f64) -> f64 {
        self.path.cost * rate
    }

    /// True if the walk passes through `label`.
    pub fn visits(&self, label: &str) -> bool {
        self.path.nodes.iter().any(|n| n == label)
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tour ({})", self.construction)?;
        writeln!(f, "  Cost: {:.2}", self.path.cost)?;
        writeln!(f, "  Closed: {}", self.closed)?;
        writeln!(f, "  Improved: {}", self.improved)?;
        writeln!(f, "  Visit order: {}", self.visit_order.join(", "))?;
        writeln!(f, "  Walk: {}", self.path.nodes.join(" -> "))
    }
}
