//! Delivery Routes Library
//!
//! Shortest paths and approximate travelling-salesman tours over a small
//! weighted, undirected graph of delivery points.
//!
//! # Features
//!
//! - Graph model with validated, non-negative edge weights
//! - Dijkstra shortest paths with deterministic tie-breaking
//! - Approximate tours: metric closure, Nearest Neighbor / double-tree
//!   construction, 2-opt and Or-opt improvement
//! - Reference dataset of delivery points and JSON graph files
//!
//! # Example
//!
//! ```
//! use delivery_routes::dataset::build_graph;
//! use delivery_routes::shortest_path::shortest_path;
//! use delivery_routes::tour::approximate_tour;
//!
//! let graph = build_graph().unwrap();
//!
//! let path = shortest_path(&graph, "Lago Norte", "Lago Sul").unwrap();
//! assert_eq!(path.cost, 18.0);
//!
//! let tour = approximate_tour(&graph, None, true).unwrap();
//! assert_eq!(tour.nodes().first(), tour.nodes().last());
//! println!("Tour cost: {:.2}", tour.cost());
//! ```

pub mod cancel;
pub mod closure;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod path;
pub mod report;
pub mod shortest_path;
pub mod tour;

pub use cancel::CancelToken;
pub use error::{GraphError, LoadError, Result};
pub use graph::{validate_nodes, Graph, GraphData, NodeValidation};
pub use path::{Path, Tour};
pub use shortest_path::{shortest_path, shortest_paths_from, ShortestPaths};
pub use tour::{approximate_tour, approximate_tour_with, TourConfig};
