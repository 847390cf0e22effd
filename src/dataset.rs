//! Reference delivery dataset and graph files.

use crate::error::{GraphError, LoadError};
use crate::graph::{Graph, GraphData};
use std::fs::File;
use std::io::{BufReader, BufWriter};

/// Delivery points of the reference dataset, in insertion order.
pub const DELIVERY_POINTS: [&str; 6] = [
    "Asa Norte",
    "Asa Sul",
    "Lago Sul",
    "Esplanada",
    "Lago Norte",
    "Vila Planalto",
];

/// Undirected connections of the reference dataset: (from, to, distance).
pub const CONNECTIONS: [(&str, &str, f64); 10] = [
    ("Lago Sul", "Esplanada", 11.0),
    ("Lago Sul", "Asa Sul", 5.0),
    ("Lago Sul", "Vila Planalto", 14.0),
    ("Lago Norte", "Vila Planalto", 7.0),
    ("Lago Norte", "Esplanada", 8.0),
    ("Lago Norte", "Asa Norte", 12.0),
    ("Vila Planalto", "Esplanada", 10.0),
    ("Asa Norte", "Esplanada", 6.0),
    ("Asa Norte", "Asa Sul", 12.0),
    ("Asa Sul", "Esplanada", 5.0),
];

/// Build the reference graph of delivery points.
pub fn build_graph() -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    for point in DELIVERY_POINTS {
        graph.add_node(point)?;
    }
    for (from, to, weight) in CONNECTIONS {
        graph.add_edge(from, to, weight)?;
    }
    Ok(graph)
}

/// Read a graph from a JSON file of the form
/// `{"nodes": [...], "edges": [{"from": .., "to": .., "weight": ..}]}`.
///
/// Malformed JSON fails with `LoadError::Json`; well-formed data describing
/// an invalid graph fails with `LoadError::Graph`.
pub fn load_graph<P: AsRef<std::path::Path>>(path: P) -> Result<Graph, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let data: GraphData = serde_json::from_reader(reader)?;
    let graph = Graph::try_from(data)?;
    log::debug!("loaded graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    Ok(graph)
}

/// Write a graph as pretty-printed JSON.
pub fn save_graph<P: AsRef<std::path::Path>>(path: P, graph: &Graph) -> Result<(), LoadError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, graph)?;
    Ok(())
}
