//! Weighted undirected graph of delivery points.
//!
//! Nodes are identified by their label and keep insertion order, which every
//! algorithm in the crate uses as its iteration order. Edge weights are
//! finite and non-negative; violations are rejected at insertion time so the
//! query side can assume a well-formed graph.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// An undirected weighted edge, stored by node index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// The graph: labelled nodes plus undirected weighted edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    /// Per node: (neighbor, edge id), in edge insertion order.
    adjacency: Vec<Vec<(usize, usize)>>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Labels are unique.
    pub fn add_node(&mut self, label: impl Into<String>) -> Result<usize> {
        let label = label.into();
        if self.index.contains_key(&label) {
            return Err(GraphError::DuplicateNode(label));
        }
        let id = self.labels.len();
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Insert an undirected edge between two existing nodes.
    ///
    /// A second edge between the same pair overwrites the weight of the
    /// first one and keeps its position in the iteration order.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<()> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        if ia == ib {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: a.to_string(),
                to: b.to_string(),
                weight,
            });
        }

        if let Some(edge_id) = self.edge_id(ia, ib) {
            log::debug!(
                "overwriting edge {} - {}: {} -> {}",
                a,
                b,
                self.edges[edge_id].weight,
                weight
            );
            self.edges[edge_id].weight = weight;
            return Ok(());
        }

        let edge_id = self.edges.len();
        self.edges.push(Edge { a: ia, b: ib, weight });
        self.adjacency[ia].push((ib, edge_id));
        self.adjacency[ib].push((ia, edge_id));
        Ok(())
    }

    /// Resolve a label to its node index.
    pub fn node_index(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::unknown_node(label))
    }

    /// Label of the node at `id`. Panics if `id` is out of range.
    #[inline]
    pub fn label(&self, id: usize) -> &str {
        &self.labels[id]
    }

    pub fn has_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// All node labels in insertion order.
    pub fn nodes(&self) -> &[String] {
        &self.labels
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Adjacent nodes and edge weights of `label`, in edge insertion order.
    pub fn neighbors(&self, label: &str) -> Result<Vec<(&str, f64)>> {
        let id = self.node_index(label)?;
        Ok(self
            .neighbors_of(id)
            .map(|(n, w)| (self.label(n), w))
            .collect())
    }

    /// Index-based neighbor iteration used by the algorithms.
    #[inline]
    pub fn neighbors_of(&self, id: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[id]
            .iter()
            .map(move |&(n, e)| (n, self.edges[e].weight))
    }

    fn edge_id(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a]
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, e)| e)
    }

    /// Weight of the edge between two nodes, if they are adjacent.
    pub fn edge_weight(&self, a: &str, b: &str) -> Result<Option<f64>> {
        let ia = self.node_index(a)?;
        let ib = self.node_index(b)?;
        Ok(self.edge_id(ia, ib).map(|e| self.edges[e].weight))
    }

    /// Sum of edge weights along a node sequence.
    ///
    /// Fails if a label is unknown or two consecutive nodes are not adjacent.
    pub fn walk_cost<S: AsRef<str>>(&self, walk: &[S]) -> Result<f64> {
        let ids = walk
            .iter()
            .map(|s| self.node_index(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.walk_cost_ids(&ids)
    }

    /// Weights are summed in ascending order, so a walk and its reverse
    /// report bit-identical costs.
    pub(crate) fn walk_cost_ids(&self, walk: &[usize]) -> Result<f64> {
        let mut weights = Vec::with_capacity(walk.len().saturating_sub(1));
        for pair in walk.windows(2) {
            let edge = self.edge_id(pair[0], pair[1]).ok_or_else(|| GraphError::MissingEdge {
                from: self.label(pair[0]).to_string(),
                to: self.label(pair[1]).to_string(),
            })?;
            weights.push(self.edges[edge].weight);
        }
        weights.sort_by(f64::total_cmp);
        Ok(weights.iter().sum())
    }

    /// True if every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        if self.labels.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.labels.len()];
        let mut queue = VecDeque::from([0]);
        seen[0] = true;
        let mut reached = 1;
        while let Some(u) = queue.pop_front() {
            for (v, _) in self.neighbors_of(u) {
                if !seen[v] {
                    seen[v] = true;
                    reached += 1;
                    queue.push_back(v);
                }
            }
        }
        reached == self.labels.len()
    }

    /// Summary figures about the graph.
    pub fn statistics(&self) -> GraphStatistics {
        let weights: Vec<f64> = self.edges.iter().map(|e| e.weight).collect();
        let total_weight = weights.iter().sum::<f64>();
        let mean_weight = if weights.is_empty() {
            0.0
        } else {
            total_weight / weights.len() as f64
        };
        let max_degree = self.adjacency.iter().map(Vec::len).max().unwrap_or(0);

        GraphStatistics {
            nodes: self.node_count(),
            edges: self.edge_count(),
            total_weight,
            min_weight: weights.iter().cloned().reduce(f64::min).unwrap_or(0.0),
            max_weight: weights.iter().cloned().fold(0.0, f64::max),
            mean_weight,
            max_degree,
            connected: self.is_connected(),
        }
    }
}

/// Plain description of a graph, used for (de)serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self> {
        let mut graph = Graph::new();
        for node in data.nodes {
            graph.add_node(node)?;
        }
        for edge in &data.edges {
            graph.add_edge(&edge.from, &edge.to, edge.weight)?;
        }
        Ok(graph)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        let edges = graph
            .edges
            .iter()
            .map(|e| EdgeData {
                from: graph.labels[e.a].clone(),
                to: graph.labels[e.b].clone(),
                weight: e.weight,
            })
            .collect();
        GraphData {
            nodes: graph.labels,
            edges,
        }
    }
}

/// Result of checking caller-supplied labels against a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeValidation {
    pub valid: bool,
    /// Labels absent from the graph, in input order.
    pub missing: Vec<String>,
}

/// Check that every label names a node of `graph`.
pub fn validate_nodes<S: AsRef<str>>(graph: &Graph, names: &[S]) -> NodeValidation {
    let missing: Vec<String> = names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !graph.has_node(name))
        .map(str::to_string)
        .collect();
    NodeValidation {
        valid: missing.is_empty(),
        missing,
    }
}

/// Statistics about a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub nodes: usize,
    pub edges: usize,
    pub total_weight: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub mean_weight: f64,
    pub max_degree: usize,
    pub connected: bool,
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph:")?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Edges: {}", self.edges)?;
        writeln!(f, "  Connected: {}", self.connected)?;
        writeln!(f, "  Max degree: {}", self.max_degree)?;
        if self.edges > 0 {
            writeln!(f, "  Total weight: {:.2}", self.total_weight)?;
            writeln!(f, "  Min weight: {:.2}", self.min_weight)?;
            writeln!(f, "  Max weight: {:.2}", self.max_weight)?;
            writeln!(f, "  Mean weight: {:.2}", self.mean_weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut g = Graph::new();
        for n in ["A", "B", "C"] {
            g.add_node(n).unwrap();
        }
        g.add_edge("A", "B", 1.0).unwrap();
        g.add_edge("B", "C", 2.0).unwrap();
        g.add_edge("A", "C", 4.0).unwrap();
        g
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut g = triangle();
        assert_eq!(g.add_node("A"), Err(GraphError::DuplicateNode("A".into())));
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_edge_validation() {
        let mut g = triangle();
        assert_eq!(
            g.add_edge("A", "Z", 1.0),
            Err(GraphError::UnknownNode("Z".into()))
        );
        assert_eq!(g.add_edge("A", "A", 1.0), Err(GraphError::SelfLoop("A".into())));
        assert!(matches!(
            g.add_edge("A", "B", -1.0),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            g.add_edge("A", "B", f64::NAN),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_duplicate_edge_overwrites() {
        let mut g = triangle();
        g.add_edge("C", "A", 3.0).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge_weight("A", "C").unwrap(), Some(3.0));
        let neighbors = g.neighbors("A").unwrap();
        assert_eq!(neighbors, vec![("B", 1.0), ("C", 3.0)]);
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let g = triangle();
        assert_eq!(g.neighbors("C").unwrap(), vec![("B", 2.0), ("A", 4.0)]);
        assert!(g.neighbors("Z").is_err());
    }

    #[test]
    fn test_walk_cost() {
        let g = triangle();
        assert_eq!(g.walk_cost(&["A", "B", "C", "A"]).unwrap(), 7.0);
        assert_eq!(g.walk_cost(&["B"]).unwrap(), 0.0);

        let mut g = triangle();
        g.add_node("D").unwrap();
        assert!(matches!(
            g.walk_cost(&["A", "D"]),
            Err(GraphError::MissingEdge { .. })
        ));
    }

    #[test]
    fn test_validate_nodes() {
        let g = triangle();
        let ok = validate_nodes(&g, &["A", "C"]);
        assert!(ok.valid);
        assert!(ok.missing.is_empty());

        let bad = validate_nodes(&g, &["A", "Nonexistent", "Q"]);
        assert!(!bad.valid);
        assert_eq!(bad.missing, vec!["Nonexistent".to_string(), "Q".to_string()]);
    }

    #[test]
    fn test_connectivity_and_statistics() {
        let mut g = triangle();
        let stats = g.statistics();
        assert!(stats.connected);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.max_weight, 4.0);
        assert_eq!(stats.min_weight, 1.0);

        g.add_node("Island").unwrap();
        assert!(!g.is_connected());
    }

    #[test]
    fn test_statistics_without_edges() {
        let mut g = Graph::new();
        g.add_node("Alone").unwrap();
        let stats = g.statistics();
        assert_eq!(stats.min_weight, 0.0);
        assert_eq!(stats.max_weight, 0.0);
        assert_eq!(stats.mean_weight, 0.0);

        let json = serde_json::to_string(&stats).unwrap();
        let back: GraphStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.min_weight, 0.0);
        assert_eq!(back.nodes, 1);
    }

    #[test]
    fn test_walk_cost_independent_of_direction() {
        let mut g = Graph::new();
        for n in ["A", "B", "C", "D"] {
            g.add_node(n).unwrap();
        }
        g.add_edge("A", "B", 0.1).unwrap();
        g.add_edge("B", "C", 0.2).unwrap();
        g.add_edge("C", "D", 0.3).unwrap();

        let forward = g.walk_cost(&["A", "B", "C", "D"]).unwrap();
        let backward = g.walk_cost(&["D", "C", "B", "A"]).unwrap();
        assert_eq!(forward.to_bits(), backward.to_bits());
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let g = triangle();
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nodes(), g.nodes());
        assert_eq!(back.edge_weight("B", "C").unwrap(), Some(2.0));

        let bad = r#"{"nodes":["A","B"],"edges":[{"from":"A","to":"B","weight":-2}]}"#;
        assert!(serde_json::from_str::<Graph>(bad).is_err());
    }
}
