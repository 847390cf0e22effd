//! Approximate travelling-salesman tours.
//!
//! Pipeline: resolve the node subset, build its metric closure, construct an
//! initial cycle, improve it with local search, optionally open it by
//! dropping its heaviest leg, then expand every closure leg back into the
//! real shortest walk. The reported cost is recomputed on the original graph
//! from the final walk. The result is a heuristic answer and carries no
//! optimality claim.

use crate::cancel::{self, CancelToken};
use crate::closure::MetricClosure;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::heuristics::{
    CandidateTour, Construction, ConstructionHeuristic, LocalSearch, MultiStartConstruction, VND,
};
use crate::path::{Path, Tour};

/// Tour query configuration
#[derive(Debug, Clone)]
pub struct TourConfig {
    /// Return to the starting node
    pub close_cycle: bool,
    /// Construction heuristics to try; the cheapest cycle wins
    pub constructions: Vec<Construction>,
    /// Run 2-opt / Or-opt after construction
    pub local_search: bool,
    /// Move budget for each local search operator
    pub max_rounds: usize,
    /// Polled between construction and improvement steps
    pub cancel: Option<CancelToken>,
}

impl Default for TourConfig {
    fn default() -> Self {
        TourConfig {
            close_cycle: true,
            constructions: vec![Construction::NearestNeighbor, Construction::DoubleTree],
            local_search: true,
            max_rounds: 100,
            cancel: None,
        }
    }
}

/// Approximate tour over `nodes` (all graph nodes, in insertion order, when `None`).
pub fn approximate_tour(graph: &Graph, nodes: Option<&[&str]>, close_cycle: bool) -> Result<Tour> {
    let config = TourConfig {
        close_cycle,
        ..TourConfig::default()
    };
    approximate_tour_with(graph, nodes, &config)
}

/// Approximate tour with explicit configuration.
pub fn approximate_tour_with(graph: &Graph, nodes: Option<&[&str]>, config: &TourConfig) -> Result<Tour> {
    let token = config.cancel.as_ref();
    let subset = resolve_subset(graph, nodes)?;

    match subset.len() {
        0 => return Err(GraphError::EmptyTour),
        1 => return Ok(single_node_tour(graph, subset[0], config.close_cycle)),
        _ => {}
    }

    let closure = MetricClosure::build(graph, &subset, token)?;

    let multi = MultiStartConstruction::new(&config.constructions);
    let mut candidate = multi.construct(&closure, token)?;
    let constructed = candidate.clone();

    let improved = if config.local_search {
        VND::with_max_rounds(config.max_rounds).improve(&closure, &mut candidate, token)?
            && candidate.order != constructed.order
    } else {
        false
    };
    cancel::check(token)?;
    log::debug!(
        "{} cycle: closure cost {:.2} -> {:.2}",
        candidate.algorithm,
        constructed.cost,
        candidate.cost
    );

    let order = if config.close_cycle {
        let mut order = candidate.order.clone();
        order.push(order[0]);
        order
    } else {
        open_at_heaviest_leg(&closure, &candidate)
    };

    let walk = closure.expand(&order);
    let path = Path::from_ids(graph, &walk)?;
    let visit_order = order
        .iter()
        .take(subset.len())
        .map(|&pos| graph.label(closure.node(pos)).to_string())
        .collect();

    Ok(Tour {
        path,
        visit_order,
        closed: config.close_cycle,
        construction: candidate.algorithm,
        improved,
    })
}

/// Graph indices of the requested nodes, first occurrence kept.
fn resolve_subset(graph: &Graph, nodes: Option<&[&str]>) -> Result<Vec<usize>> {
    let Some(nodes) = nodes else {
        return Ok((0..graph.node_count()).collect());
    };

    let mut subset: Vec<usize> = Vec::with_capacity(nodes.len());
    for label in nodes {
        let id = graph.node_index(label)?;
        if !subset.contains(&id) {
            subset.push(id);
        }
    }
    Ok(subset)
}

fn single_node_tour(graph: &Graph, node: usize, close_cycle: bool) -> Tour {
    let label = graph.label(node).to_string();
    let nodes = if close_cycle {
        vec![label.clone(), label.clone()]
    } else {
        vec![label.clone()]
    };
    Tour {
        path: Path { nodes, cost: 0.0 },
        visit_order: vec![label],
        closed: close_cycle,
        construction: "Trivial".to_string(),
        improved: false,
    }
}

/// Turn a cycle into an open walk by removing its heaviest leg.
///
/// Among equally heavy legs the last one in cycle order is removed, so a
/// tie keeps the cycle's original start.
fn open_at_heaviest_leg(closure: &MetricClosure, tour: &CandidateTour) -> Vec<usize> {
    let n = tour.order.len();
    let mut cut = n - 1;
    let mut heaviest = f64::NEG_INFINITY;
    for k in 0..n {
        let leg = closure.distance(tour.order[k], tour.order[(k + 1) % n]);
        if leg >= heaviest - 1e-9 {
            heaviest = heaviest.max(leg);
            cut = k;
        }
    }

    tour.order[cut + 1..]
        .iter()
        .chain(&tour.order[..=cut])
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn star() -> Graph {
        // hub H with three spokes; spokes are only reachable through H
        let mut g = Graph::new();
        for n in ["H", "X", "Y", "Z"] {
            g.add_node(n).unwrap();
        }
        g.add_edge("H", "X", 1.0).unwrap();
        g.add_edge("H", "Y", 2.0).unwrap();
        g.add_edge("H", "Z", 3.0).unwrap();
        g
    }

    fn random_connected_graph(rng: &mut ChaCha8Rng, n: usize) -> Graph {
        let mut g = Graph::new();
        for i in 0..n {
            g.add_node(format!("v{}", i)).unwrap();
        }
        for i in 1..n {
            let j = rng.gen_range(0..i);
            g.add_edge(&format!("v{}", i), &format!("v{}", j), rng.gen_range(1..15) as f64)
                .unwrap();
        }
        for _ in 0..n {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            if a != b {
                g.add_edge(&format!("v{}", a), &format!("v{}", b), rng.gen_range(1..15) as f64)
                    .unwrap();
            }
        }
        g
    }

    #[test]
    fn test_empty_and_unknown_subsets() {
        let g = star();
        let none: &[&str] = &[];
        assert_eq!(approximate_tour(&g, Some(none), true), Err(GraphError::EmptyTour));
        assert_eq!(
            approximate_tour(&g, Some(&["H", "Nowhere"][..]), true),
            Err(GraphError::UnknownNode("Nowhere".into()))
        );
        assert_eq!(
            approximate_tour(&Graph::new(), None, true),
            Err(GraphError::EmptyTour)
        );
    }

    #[test]
    fn test_single_node() {
        let g = star();
        let closed = approximate_tour(&g, Some(&["Y"][..]), true).unwrap();
        assert_eq!(closed.nodes(), &["Y", "Y"]);
        assert_eq!(closed.cost(), 0.0);

        let open = approximate_tour(&g, Some(&["Y", "Y"][..]), false).unwrap();
        assert_eq!(open.nodes(), &["Y"]);
        assert_eq!(open.cost(), 0.0);
    }

    #[test]
    fn test_tour_walks_through_intermediate_nodes() {
        let g = star();
        let tour = approximate_tour(&g, Some(&["X", "Y", "Z"][..]), true).unwrap();
        assert_eq!(tour.nodes().first(), tour.nodes().last());
        assert_eq!(tour.nodes()[0], "X");
        assert!(tour.visits("H"));
        // every spoke is entered and left once: 2 * (1 + 2 + 3)
        assert_eq!(tour.cost(), 12.0);
        assert_eq!(g.walk_cost(tour.nodes()).unwrap(), tour.cost());
        assert_eq!(tour.visit_order.len(), 3);
    }

    #[test]
    fn test_open_tour_drops_heaviest_leg() {
        let g = star();
        let tour = approximate_tour(&g, Some(&["X", "Y", "Z"][..]), false).unwrap();
        // closure legs: X-Y 3, Y-Z 5, Z-X 4; the 5 leg goes
        assert_eq!(tour.visit_order, vec!["Z", "X", "Y"]);
        assert_eq!(tour.nodes(), &["Z", "H", "X", "H", "Y"]);
        assert_eq!(tour.cost(), 7.0);
        assert!(!tour.closed);
    }

    #[test]
    fn test_visit_order_follows_closure_not_walk() {
        // X -> Y runs through H at zero cost; H is a target visited last
        let mut g = Graph::new();
        for n in ["X", "H", "Y"] {
            g.add_node(n).unwrap();
        }
        g.add_edge("X", "H", 0.0).unwrap();
        g.add_edge("H", "Y", 0.0).unwrap();
        let config = TourConfig {
            local_search: false,
            ..TourConfig::default()
        };

        let tour = approximate_tour_with(&g, Some(&["X", "Y", "H"][..]), &config).unwrap();
        assert_eq!(tour.visit_order, vec!["X", "Y", "H"]);
        assert_eq!(tour.nodes(), &["X", "H", "Y", "H", "X"]);
        assert_eq!(tour.cost(), 0.0);
    }

    #[test]
    fn test_two_nodes_open_keeps_start() {
        let g = star();
        let tour = approximate_tour(&g, Some(&["X", "Z"][..]), false).unwrap();
        assert_eq!(tour.nodes(), &["X", "H", "Z"]);
        assert_eq!(tour.cost(), 4.0);
    }

    #[test]
    fn test_disconnected_subset() {
        let mut g = star();
        g.add_node("Island").unwrap();
        assert_eq!(
            approximate_tour(&g, None, true),
            Err(GraphError::no_path("H", "Island"))
        );
        // nodes that do not need the island still work
        assert!(approximate_tour(&g, Some(&["X", "Y"][..]), true).is_ok());
    }

    #[test]
    fn test_cancelled_tour() {
        let g = star();
        let token = CancelToken::new();
        token.cancel();
        let config = TourConfig {
            cancel: Some(token),
            ..TourConfig::default()
        };
        assert_eq!(
            approximate_tour_with(&g, None, &config),
            Err(GraphError::Cancelled)
        );
    }

    #[test]
    fn test_random_tours_are_valid_walks() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for n in 2..12 {
            let g = random_connected_graph(&mut rng, n);
            for close_cycle in [true, false] {
                let tour = approximate_tour(&g, None, close_cycle).unwrap();
                for label in g.nodes() {
                    assert!(tour.visits(label), "{} missing", label);
                }
                assert_eq!(g.walk_cost(tour.nodes()).unwrap(), tour.cost());
                if close_cycle {
                    assert_eq!(tour.nodes()[0], "v0");
                    assert_eq!(tour.nodes().first(), tour.nodes().last());
                }

                let again = approximate_tour(&g, None, close_cycle).unwrap();
                assert_eq!(tour, again);
            }
        }
    }

    #[test]
    fn test_local_search_does_not_worsen() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for n in 4..10 {
            let g = random_connected_graph(&mut rng, n);
            let plain = TourConfig {
                local_search: false,
                ..TourConfig::default()
            };
            let raw = approximate_tour_with(&g, None, &plain).unwrap();
            let improved = approximate_tour(&g, None, true).unwrap();
            assert!(improved.cost() <= raw.cost() + 1e-9);
            assert!(!raw.improved);
        }
    }
}
