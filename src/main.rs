//! Delivery Routes - Command Line Interface
//!
//! Runs shortest-path and tour queries over the reference delivery graph or
//! a graph loaded from a JSON file.

use clap::{Parser, Subcommand};
use delivery_routes::dataset::{build_graph, load_graph};
use delivery_routes::graph::{validate_nodes, Graph};
use delivery_routes::report::{write_json, write_paths_csv, PathReport, PathsReport, TourReport};
use delivery_routes::shortest_path::{shortest_path, shortest_paths_from};
use delivery_routes::tour::{approximate_tour_with, TourConfig};
use serde::Serialize;

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "delivery-routes")]
#[command(version = "1.0")]
#[command(about = "Shortest paths and approximate delivery tours over a weighted graph")]
struct Cli {
    /// Graph file (JSON); the reference dataset is used when omitted
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    /// Write the query result as JSON to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest path between two nodes
    Path {
        #[arg(short, long)]
        from: String,

        #[arg(short, long)]
        to: String,
    },

    /// Shortest paths from one node to every reachable node
    Paths {
        #[arg(short, long)]
        from: String,

        /// Export the table to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Approximate travelling-salesman tour
    Tour {
        /// Comma-separated nodes to visit (all nodes when omitted)
        #[arg(short, long, value_delimiter = ',')]
        nodes: Option<Vec<String>>,

        /// Do not return to the starting node
        #[arg(long)]
        open: bool,

        /// Price per unit of distance
        #[arg(short, long, default_value = "20.0")]
        rate: f64,

        /// Skip 2-opt / Or-opt improvement
        #[arg(long)]
        no_improve: bool,
    },

    /// Check that node names exist in the graph
    Validate {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print graph statistics
    Analyze,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let graph = match &cli.graph {
        Some(path) => match load_graph(path) {
            Ok(graph) => graph,
            Err(e) => {
                eprintln!("Error loading graph {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => build_graph().unwrap_or_else(|e| fail(e)),
    };
    log::info!(
        "graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let output = cli.output.as_ref();
    match cli.command {
        Commands::Path { from, to } => run_path(&graph, &from, &to, output),
        Commands::Paths { from, csv } => run_paths(&graph, &from, csv, output),
        Commands::Tour { nodes, open, rate, no_improve } => {
            run_tour(&graph, nodes, !open, rate, !no_improve, cli.verbose, output)
        }
        Commands::Validate { names } => run_validate(&graph, &names, output),
        Commands::Analyze => run_analyze(&graph, output),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn save<T: Serialize>(output: Option<&PathBuf>, report: &T) {
    if let Some(path) = output {
        if let Err(e) = write_json(path, report) {
            fail(format!("cannot write {:?}: {}", path, e));
        }
        println!("\nResult saved to {:?}", path);
    }
}

fn run_path(graph: &Graph, from: &str, to: &str, output: Option<&PathBuf>) {
    let path = shortest_path(graph, from, to).unwrap_or_else(|e| fail(e));
    println!("Shortest path {} -> {}: {}", from, to, path);
    save(output, &PathReport::new(from, to, path));
}

fn run_paths(graph: &Graph, from: &str, csv: Option<PathBuf>, output: Option<&PathBuf>) {
    let paths = shortest_paths_from(graph, from).unwrap_or_else(|e| fail(e));

    println!("Shortest paths from {}:", from);
    for path in paths.iter() {
        println!("  {:<15} {}", path.target().unwrap_or_default(), path);
    }
    let unreachable: Vec<&String> = graph
        .nodes()
        .iter()
        .filter(|n| paths.get(n).is_none())
        .collect();
    if !unreachable.is_empty() {
        println!("Unreachable: {:?}", unreachable);
    }

    if let Some(csv_path) = csv {
        if let Err(e) = write_paths_csv(&csv_path, &paths) {
            fail(format!("cannot write {:?}: {}", csv_path, e));
        }
        println!("\nTable exported to {:?}", csv_path);
    }
    save(output, &PathsReport::new(paths));
}

fn run_tour(
    graph: &Graph,
    nodes: Option<Vec<String>>,
    close_cycle: bool,
    rate: f64,
    local_search: bool,
    verbose: bool,
    output: Option<&PathBuf>,
) {
    if let Some(nodes) = &nodes {
        let check = validate_nodes(graph, nodes);
        if !check.valid {
            fail(format!("unknown nodes: {}", check.missing.join(", ")));
        }
    }

    let config = TourConfig {
        close_cycle,
        local_search,
        ..TourConfig::default()
    };
    let subset: Option<Vec<&str>> = nodes
        .as_ref()
        .map(|n| n.iter().map(String::as_str).collect());

    let start = Instant::now();
    let tour = approximate_tour_with(graph, subset.as_deref(), &config).unwrap_or_else(|e| fail(e));
    let elapsed = start.elapsed();

    println!("========== Tour ==========");
    println!("Walk: {}", tour.nodes().join(" -> "));
    println!("Cost: {:.2}", tour.cost());
    println!("Price: {:.2} (at {:.2} per unit)", tour.price(rate), rate);
    if verbose {
        println!("\n{}", tour);
        println!("Time: {:.6}s", elapsed.as_secs_f64());
    }
    save(output, &TourReport::new(tour, rate));
}

fn run_validate(graph: &Graph, names: &[String], output: Option<&PathBuf>) {
    let check = validate_nodes(graph, names);
    if check.valid {
        println!("All {} nodes found", names.len());
    } else {
        println!("Missing nodes: {}", check.missing.join(", "));
    }
    save(output, &check);
    if !check.valid {
        std::process::exit(2);
    }
}

fn run_analyze(graph: &Graph, output: Option<&PathBuf>) {
    println!("========== Graph Analysis ==========\n");
    let stats = graph.statistics();
    println!("{}", stats);

    println!("Adjacency:");
    for node in graph.nodes() {
        let neighbors = graph.neighbors(node).unwrap_or_default();
        let listed: Vec<String> = neighbors
            .iter()
            .map(|(n, w)| format!("{} ({})", n, w))
            .collect();
        println!("  {:<15} {}", node, listed.join(", "));
    }
    save(output, &stats);
}
