//! Dijkstra's single-source shortest paths.
//!
//! The priority queue is keyed by `(distance, discovery sequence)`, where the
//! sequence is a push counter. Equal tentative distances therefore settle in
//! the order they were discovered, and neighbors are relaxed in edge
//! insertion order. Relaxation only accepts strict improvements, so among
//! several equal-cost paths the first one discovered is kept. Together these
//! make every query reproducible across runs.

use crate::cancel::{self, CancelToken};
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::path::Path;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Distances and predecessor links from a single source.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<'g> {
    graph: &'g Graph,
    source: usize,
    dist: Vec<f64>,
    pred: Vec<Option<usize>>,
}

impl<'g> ShortestPathTree<'g> {
    pub fn source(&self) -> &str {
        self.graph.label(self.source)
    }

    /// Shortest distance to `label`, `None` when unreachable.
    pub fn distance(&self, label: &str) -> Result<Option<f64>> {
        let id = self.graph.node_index(label)?;
        Ok(self.distance_to(id))
    }

    #[inline]
    pub(crate) fn distance_to(&self, id: usize) -> Option<f64> {
        let d = self.dist[id];
        d.is_finite().then_some(d)
    }

    /// Node indices from the source to `target`, `None` when unreachable.
    pub(crate) fn path_ids(&self, target: usize) -> Option<Vec<usize>> {
        self.distance_to(target)?;
        let mut ids = vec![target];
        let mut current = target;
        while let Some(prev) = self.pred[current] {
            ids.push(prev);
            current = prev;
        }
        ids.reverse();
        Some(ids)
    }

    /// Shortest path to `label`.
    pub fn path_to(&self, label: &str) -> Result<Path> {
        let target = self.graph.node_index(label)?;
        let ids = self
            .path_ids(target)
            .ok_or_else(|| GraphError::no_path(self.source(), label))?;
        Path::from_ids(self.graph, &ids)
    }

    /// Paths to every reachable node, in graph node order.
    pub fn paths(&self) -> Result<ShortestPaths> {
        let mut paths = Vec::new();
        for target in 0..self.graph.node_count() {
            if let Some(ids) = self.path_ids(target) {
                paths.push(Path::from_ids(self.graph, &ids)?);
            }
        }
        Ok(ShortestPaths {
            source: self.source().to_string(),
            paths,
        })
    }
}

/// Run Dijkstra from `source` over the whole graph.
pub fn shortest_path_tree<'g>(graph: &'g Graph, source: &str) -> Result<ShortestPathTree<'g>> {
    let source = graph.node_index(source)?;
    dijkstra(graph, source, None)
}

/// Like [`shortest_path_tree`], polling `token` before every settle.
pub fn shortest_path_tree_cancellable<'g>(
    graph: &'g Graph,
    source: &str,
    token: &CancelToken,
) -> Result<ShortestPathTree<'g>> {
    let source = graph.node_index(source)?;
    dijkstra(graph, source, Some(token))
}

pub(crate) fn dijkstra<'g>(
    graph: &'g Graph,
    source: usize,
    token: Option<&CancelToken>,
) -> Result<ShortestPathTree<'g>> {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist[source] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), seq, source)));

    while let Some(Reverse((OrderedFloat(d), _, u))) = heap.pop() {
        cancel::check(token)?;
        if settled[u] || d > dist[u] {
            continue;
        }
        settled[u] = true;
        log::trace!("settled {} at {}", graph.label(u), d);

        for (v, w) in graph.neighbors_of(u) {
            if settled[v] {
                continue;
            }
            let candidate = d + w;
            if candidate < dist[v] {
                dist[v] = candidate;
                pred[v] = Some(u);
                seq += 1;
                heap.push(Reverse((OrderedFloat(candidate), seq, v)));
            }
        }
    }

    Ok(ShortestPathTree {
        graph,
        source,
        dist,
        pred,
    })
}

/// Shortest path between two nodes.
///
/// `source == target` yields the single-node path with cost 0.
pub fn shortest_path(graph: &Graph, source: &str, target: &str) -> Result<Path> {
    graph.node_index(target)?;
    shortest_path_tree(graph, source)?.path_to(target)
}

/// Shortest paths from `source` to every reachable node.
pub fn shortest_paths_from(graph: &Graph, source: &str) -> Result<ShortestPaths> {
    shortest_path_tree(graph, source)?.paths()
}

/// Shortest paths from one source, keyed by target in graph node order.
///
/// Unreachable targets are absent. The source itself maps to its
/// single-node path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPaths {
    pub source: String,
    pub paths: Vec<Path>,
}

impl ShortestPaths {
    pub fn get(&self, target: &str) -> Option<&Path> {
        self.paths.iter().find(|p| p.target() == Some(target))
    }

    pub fn cost(&self, target: &str) -> Option<f64> {
        self.get(target).map(|p| p.cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
