//! Metric closure over a subset of graph nodes.
//!
//! The closure is a complete graph on the subset where the weight of each
//! pair is its shortest-path distance in the original graph. The tour
//! heuristics work on closure positions `0..len()`; the stored legs map
//! every closure edge back to the real walk that realises it.

use crate::cancel::CancelToken;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::shortest_path::dijkstra;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct MetricClosure {
    /// Graph node index of each closure position
    nodes: Vec<usize>,
    dist: Vec<Vec<f64>>,
    /// legs[i][j]: node indices of the shortest walk from position i to j
    legs: Vec<Vec<Vec<usize>>>,
}

impl MetricClosure {
    /// Build the closure over `subset` (graph node indices, no duplicates).
    ///
    /// One Dijkstra search runs per subset node, in parallel. Fails with
    /// `NoPath` if any pair is disconnected.
    pub fn build(graph: &Graph, subset: &[usize], token: Option<&CancelToken>) -> Result<Self> {
        let trees = subset
            .par_iter()
            .map(|&source| dijkstra(graph, source, token))
            .collect::<Result<Vec<_>>>()?;

        let n = subset.len();
        let mut dist = vec![vec![0.0; n]; n];
        let mut legs = vec![vec![Vec::new(); n]; n];

        for (i, tree) in trees.iter().enumerate() {
            for (j, &target) in subset.iter().enumerate() {
                let ids = tree
                    .path_ids(target)
                    .ok_or_else(|| GraphError::no_path(graph.label(subset[i]), graph.label(target)))?;
                dist[i][j] = graph.walk_cost_ids(&ids)?;
                legs[i][j] = ids;
            }
        }

        log::debug!("metric closure built over {} nodes", n);
        Ok(MetricClosure {
            nodes: subset.to_vec(),
            dist,
            legs,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Graph node index at closure position `i`.
    #[inline]
    pub fn node(&self, i: usize) -> usize {
        self.nodes[i]
    }

    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.dist[i][j]
    }

    /// Real walk from position `i` to position `j`, both ends included.
    #[inline]
    pub fn leg(&self, i: usize, j: usize) -> &[usize] {
        &self.legs[i][j]
    }

    /// Closure cost of visiting `order` and returning to its first element.
    pub fn cycle_cost(&self, order: &[usize]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }
        self.path_cost(order) + self.distance(order[order.len() - 1], order[0])
    }

    /// Closure cost of visiting `order` without returning.
    pub fn path_cost(&self, order: &[usize]) -> f64 {
        order.windows(2).map(|w| self.distance(w[0], w[1])).sum()
    }

    /// Expand a sequence of closure positions into a walk of the original graph.
    pub fn expand(&self, order: &[usize]) -> Vec<usize> {
        let mut walk = Vec::new();
        if let Some(&first) = order.first() {
            walk.push(self.node(first));
        }
        for w in order.windows(2) {
            walk.extend_from_slice(&self.leg(w[0], w[1])[1..]);
        }
        walk
    }
}
