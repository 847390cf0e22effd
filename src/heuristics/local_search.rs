//! Local search improvement heuristics for closure tours.
//!
//! This module implements:
//! - 2-opt (segment reversal)
//! - Or-opt (segment relocation)
//! - VND chaining both
//!
//! Every operator keeps position 0 at the head of the order and uses first
//! improvement, so results only depend on the scan order.

use super::CandidateTour;
use crate::cancel::{self, CancelToken};
use crate::closure::MetricClosure;
use crate::error::Result;

const EPSILON: f64 = 1e-9;

/// Trait for local search improvement methods
pub trait LocalSearch {
    /// Improve `tour` in place; returns whether anything changed.
    fn improve(
        &self,
        closure: &MetricClosure,
        tour: &mut CandidateTour,
        token: Option<&CancelToken>,
    ) -> Result<bool>;
    fn name(&self) -> &str;
}

/// 2-Opt Local Search
///
/// Reverses segments of the cycle while that shortens it.
pub struct TwoOptSearch {
    /// Maximum number of applied moves
    pub max_rounds: usize,
}

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch { max_rounds: 100 }
    }

    /// First improving move in scan order, if any.
    fn find_move(&self, closure: &MetricClosure, tour: &CandidateTour) -> Option<(usize, usize, f64)> {
        let n = tour.order.len();
        for i in 0..n - 2 {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue; // same cycle, just reversed
                }
                let delta = tour.two_opt_delta(closure, i, j);
                if delta < -EPSILON {
                    return Some((i, j, delta));
                }
            }
        }
        None
    }
}

impl Default for TwoOptSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TwoOptSearch {
    fn improve(
        &self,
        closure: &MetricClosure,
        tour: &mut CandidateTour,
        token: Option<&CancelToken>,
    ) -> Result<bool> {
        if tour.order.len() < 4 {
            return Ok(false);
        }

        let mut improved = false;
        for _ in 0..self.max_rounds {
            cancel::check(token)?;
            let Some((i, j, delta)) = self.find_move(closure, tour) else {
                break;
            };
            log::trace!("2-opt reverse {}..={} ({:.3})", i + 1, j, delta);
            tour.apply_two_opt(i, j);
            improved = true;
        }

        tour.validate(closure);
        Ok(improved)
    }

    fn name(&self) -> &str {
        "2-Opt"
    }
}

/// Or-Opt Local Search
///
/// Relocates segments of 1 to `max_segment_length` consecutive positions.
pub struct OrOptSearch {
    /// Maximum segment length to consider
    pub max_segment_length: usize,
    /// Maximum number of applied moves
    pub max_rounds: usize,
}

impl OrOptSearch {
    pub fn new() -> Self {
        OrOptSearch {
            max_segment_length: 3,
            max_rounds: 100,
        }
    }

    /// Order with `order[start..start + len]` moved before `rest[insert_pos]`,
    /// where `rest` is the order without the segment.
    fn relocate(order: &[usize], start: usize, len: usize, insert_pos: usize) -> Vec<usize> {
        let segment = &order[start..start + len];
        let rest: Vec<usize> = order[..start]
            .iter()
            .chain(&order[start + len..])
            .copied()
            .collect();

        let mut moved = Vec::with_capacity(order.len());
        moved.extend_from_slice(&rest[..insert_pos]);
        moved.extend_from_slice(segment);
        moved.extend_from_slice(&rest[insert_pos..]);
        moved
    }

    fn find_move(&self, closure: &MetricClosure, tour: &CandidateTour) -> Option<Vec<usize>> {
        let n = tour.order.len();
        let current = closure.cycle_cost(&tour.order);

        for len in 1..=self.max_segment_length.min(n - 2) {
            for start in 1..=n - len {
                for insert_pos in 1..=n - len {
                    if insert_pos == start {
                        continue; // unchanged order
                    }
                    let candidate = Self::relocate(&tour.order, start, len, insert_pos);
                    if closure.cycle_cost(&candidate) < current - EPSILON {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

impl Default for OrOptSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for OrOptSearch {
    fn improve(
        &self,
        closure: &MetricClosure,
        tour: &mut CandidateTour,
        token: Option<&CancelToken>,
    ) -> Result<bool> {
        if tour.order.len() < 4 {
            return Ok(false);
        }

        let mut improved = false;
        for _ in 0..self.max_rounds {
            cancel::check(token)?;
            let Some(order) = self.find_move(closure, tour) else {
                break;
            };
            tour.order = order;
            tour.validate(closure);
            improved = true;
        }

        tour.validate(closure);
        Ok(improved)
    }

    fn name(&self) -> &str {
        "Or-Opt"
    }
}

/// Variable Neighborhood Descent (VND)
///
/// Applies the operators in turn, restarting from the first one whenever an
/// operator improves the tour.
pub struct VND {
    operators: Vec<Box<dyn LocalSearch + Send + Sync>>,
    max_iterations: usize,
}

impl VND {
    pub fn new() -> Self {
        VND {
            operators: Vec::new(),
            max_iterations: 100,
        }
    }

    pub fn with_standard_operators() -> Self {
        let operators: Vec<Box<dyn LocalSearch + Send + Sync>> =
            vec![Box::new(TwoOptSearch::new()), Box::new(OrOptSearch::new())];
        VND {
            operators,
            max_iterations: 100,
        }
    }

    /// Same operators with every per-operator move budget set to `max_rounds`.
    pub fn with_max_rounds(max_rounds: usize) -> Self {
        let operators: Vec<Box<dyn LocalSearch + Send + Sync>> = vec![
            Box::new(TwoOptSearch { max_rounds }),
            Box::new(OrOptSearch {
                max_rounds,
                ..OrOptSearch::new()
            }),
        ];
        VND {
            operators,
            max_iterations: max_rounds,
        }
    }

    pub fn add_operator<L: LocalSearch + Send + Sync + 'static>(&mut self, op: L) {
        self.operators.push(Box::new(op));
    }
}

impl Default for VND {
    fn default() -> Self {
        Self::with_standard_operators()
    }
}

impl LocalSearch for VND {
    fn improve(
        &self,
        closure: &MetricClosure,
        tour: &mut CandidateTour,
        token: Option<&CancelToken>,
    ) -> Result<bool> {
        let mut total_improved = false;
        let mut k = 0;
        let mut iterations = 0;

        while k < self.operators.len() && iterations < self.max_iterations {
            if self.operators[k].improve(closure, tour, token)? {
                log::debug!("{} improved tour to {:.2}", self.operators[k].name(), tour.cost);
                total_improved = true;
                k = 0;
            } else {
                k += 1;
            }
            iterations += 1;
        }

        Ok(total_improved)
    }

    fn name(&self) -> &str {
        "VND"
    }
}
