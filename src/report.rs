//! Serializable query reports and their export to JSON / CSV.

use crate::path::{Path, Tour};
use crate::shortest_path::ShortestPaths;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

/// Result of a single source/target query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathReport {
    pub generated_at: String,
    pub source: String,
    pub target: String,
    pub path: Path,
}

impl PathReport {
    pub fn new(source: &str, target: &str, path: Path) -> Self {
        PathReport {
            generated_at: timestamp(),
            source: source.to_string(),
            target: target.to_string(),
            path,
        }
    }
}

/// Result of a single-source, all-targets query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsReport {
    pub generated_at: String,
    pub paths: ShortestPaths,
}

impl PathsReport {
    pub fn new(paths: ShortestPaths) -> Self {
        PathsReport {
            generated_at: timestamp(),
            paths,
        }
    }
}

/// Result of a tour query, with its monetary estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourReport {
    pub generated_at: String,
    pub tour: Tour,
    /// Price per unit of distance
    pub rate: f64,
    /// Tour cost times `rate`
    pub price: f64,
}

impl TourReport {
    pub fn new(tour: Tour, rate: f64) -> Self {
        let price = tour.price(rate);
        TourReport {
            generated_at: timestamp(),
            tour,
            rate,
            price,
        }
    }
}

/// One CSV row per reachable target.
#[derive(Debug, Clone, Serialize)]
struct PathRow<'a> {
    source: &'a str,
    target: &'a str,
    cost: f64,
    hops: usize,
    path: String,
}

/// Write any report as pretty-printed JSON.
pub fn write_json<T: Serialize, P: AsRef<std::path::Path>>(path: P, report: &T) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Export a shortest-path table to CSV
pub fn write_paths_csv<P: AsRef<std::path::Path>>(path: P, paths: &ShortestPaths) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for p in paths.iter() {
        writer.serialize(PathRow {
            source: &paths.source,
            target: p.target().unwrap_or_default(),
            cost: p.cost,
            hops: p.hops(),
            path: p.nodes.join(" -> "),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_graph;
    use crate::shortest_path::shortest_paths_from;
    use crate::tour::approximate_tour;

    #[test]
    fn test_tour_report_price() {
        let g = build_graph().unwrap();
        let tour = approximate_tour(&g, None, true).unwrap();
        let report = TourReport::new(tour.clone(), 20.0);
        assert_eq!(report.price, tour.cost() * 20.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rate"], 20.0);
        assert!(json["generated_at"].is_string());
        assert_eq!(json["tour"]["closed"], true);
    }

    #[test]
    fn test_paths_csv_export() {
        let g = build_graph().unwrap();
        let paths = shortest_paths_from(&g, "Lago Norte").unwrap();
        let out = std::env::temp_dir().join(format!("delivery-routes-paths-{}.csv", std::process::id()));
        write_paths_csv(&out, &paths).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        std::fs::remove_file(&out).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("source,target,cost,hops,path"));
        assert_eq!(text.lines().count(), 1 + g.node_count());
        assert!(text.contains("Lago Norte,Lago Sul,18.0,3,Lago Norte -> Esplanada -> Asa Sul -> Lago Sul"));
    }
}
