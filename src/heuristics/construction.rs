use super::CandidateTour;
use crate::cancel::{self, CancelToken};
use crate::closure::MetricClosure;
use crate::error::Result;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

pub trait ConstructionHeuristic {
    fn construct(&self, closure: &MetricClosure, token: Option<&CancelToken>) -> Result<CandidateTour>;
    fn name(&self) -> &str;
}

/// Available construction heuristics.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Construction {
    NearestNeighbor,
    DoubleTree,
}

impl Construction {
    pub fn heuristic(self) -> Box<dyn ConstructionHeuristic + Send + Sync> {
        match self {
            Construction::NearestNeighbor => Box::new(NearestNeighborHeuristic),
            Construction::DoubleTree => Box::new(DoubleTreeHeuristic),
        }
    }
}

/// Nearest Neighbor Heuristic
///
/// Starts at position 0 and repeatedly moves to the closest unvisited
/// position. Ties go to the lowest position, i.e. the earliest node in the
/// caller's subset order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    fn find_nearest(&self, closure: &MetricClosure, current: usize, visited: &[bool]) -> Option<usize> {
        (0..closure.len())
            .filter(|&n| !visited[n])
            .min_by_key(|&n| OrderedFloat(closure.distance(current, n)))
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, closure: &MetricClosure, token: Option<&CancelToken>) -> Result<CandidateTour> {
        let n = closure.len();
        let mut order = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut current = 0;

        if n > 0 {
            order.push(0);
            visited[0] = true;
        }

        while let Some(next) = self.find_nearest(closure, current, &visited) {
            cancel::check(token)?;
            order.push(next);
            visited[next] = true;
            current = next;
        }

        Ok(CandidateTour::new(closure, order, self.name()))
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

/// Minimum spanning tree doubling ("double tree").
///
/// Grows a spanning tree with Prim's algorithm from position 0, then walks it
/// in preorder with children visited in ascending position. The preorder
/// already skips repeated nodes of the doubled tree walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleTreeHeuristic;

impl DoubleTreeHeuristic {
    /// Parent of every position in the spanning tree (`None` for the root).
    fn spanning_tree(&self, closure: &MetricClosure, token: Option<&CancelToken>) -> Result<Vec<Option<usize>>> {
        let n = closure.len();
        let mut in_tree = vec![false; n];
        let mut best = vec![f64::INFINITY; n];
        let mut parent = vec![None; n];

        if n == 0 {
            return Ok(parent);
        }
        best[0] = 0.0;

        for _ in 0..n {
            cancel::check(token)?;
            let Some(u) = (0..n)
                .filter(|&v| !in_tree[v])
                .min_by_key(|&v| OrderedFloat(best[v]))
            else {
                break;
            };
            in_tree[u] = true;
            for v in 0..n {
                if !in_tree[v] && closure.distance(u, v) < best[v] {
                    best[v] = closure.distance(u, v);
                    parent[v] = Some(u);
                }
            }
        }

        Ok(parent)
    }
}

impl ConstructionHeuristic for DoubleTreeHeuristic {
    fn construct(&self, closure: &MetricClosure, token: Option<&CancelToken>) -> Result<CandidateTour> {
        let n = closure.len();
        let parent = self.spanning_tree(closure, token)?;

        let mut children = vec![Vec::new(); n];
        for (v, p) in parent.iter().enumerate() {
            if let Some(p) = *p {
                children[p].push(v);
            }
        }

        let mut order = Vec::with_capacity(n);
        let mut stack = if n > 0 { vec![0] } else { Vec::new() };
        while let Some(u) = stack.pop() {
            order.push(u);
            stack.extend(children[u].iter().rev());
        }

        Ok(CandidateTour::new(closure, order, self.name()))
    }

    fn name(&self) -> &str {
        "DoubleTree"
    }
}

/// Multi-start construction: runs every heuristic and keeps the cheapest cycle.
///
/// Ties keep the heuristic listed first.
pub struct MultiStartConstruction {
    heuristics: Vec<Box<dyn ConstructionHeuristic + Send + Sync>>,
}

impl MultiStartConstruction {
    pub fn new(constructions: &[Construction]) -> Self {
        MultiStartConstruction {
            heuristics: constructions.iter().map(|c| c.heuristic()).collect(),
        }
    }

    pub fn with_all_heuristics() -> Self {
        Self::new(&[Construction::NearestNeighbor, Construction::DoubleTree])
    }
}

impl Default for MultiStartConstruction {
    fn default() -> Self {
        Self::with_all_heuristics()
    }
}

impl ConstructionHeuristic for MultiStartConstruction {
    fn construct(&self, closure: &MetricClosure, token: Option<&CancelToken>) -> Result<CandidateTour> {
        let mut best: Option<CandidateTour> = None;
        for heuristic in &self.heuristics {
            let candidate = heuristic.construct(closure, token)?;
            log::debug!("{}: closure cost {:.2}", candidate.algorithm, candidate.cost);
            if best.as_ref().map_or(true, |b| candidate.cost < b.cost) {
                best = Some(candidate);
            }
        }
        match best {
            Some(best) => Ok(best),
            None => NearestNeighborHeuristic.construct(closure, token),
        }
    }

    fn name(&self) -> &str {
        "MultiStart"
    }
}
