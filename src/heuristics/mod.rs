//! Tour heuristics over a metric closure.
//!
//! This module exports the construction and improvement heuristics. Both
//! work on closure positions: position 0 is the tour start and never moves.

pub mod construction;
pub mod local_search;

pub use construction::*;
pub use local_search::*;

use crate::closure::MetricClosure;
use serde::{Deserialize, Serialize};

/// A cyclic visiting order over closure positions, starting at position 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTour {
    pub order: Vec<usize>,
    /// Closure cost of the cycle, including the return leg
    pub cost: f64,
    /// Heuristic that built the order
    pub algorithm: String,
}

impl CandidateTour {
    pub fn new(closure: &MetricClosure, order: Vec<usize>, algorithm: &str) -> Self {
        let cost = closure.cycle_cost(&order);
        CandidateTour {
            order,
            cost,
            algorithm: algorithm.to_string(),
        }
    }

    /// Recompute the cost after the order changed.
    pub fn validate(&mut self, closure: &MetricClosure) {
        self.cost = closure.cycle_cost(&self.order);
    }

    /// Closure cost change of reversing `order[i + 1..=j]`.
    pub fn two_opt_delta(&self, closure: &MetricClosure, i: usize, j: usize) -> f64 {
        let n = self.order.len();
        let a = self.order[i];
        let b = self.order[i + 1];
        let c = self.order[j];
        let d = self.order[(j + 1) % n];
        closure.distance(a, c) + closure.distance(b, d)
            - closure.distance(a, b)
            - closure.distance(c, d)
    }

    /// Apply a 2-opt move (reverse segment between i+1 and j)
    pub fn apply_two_opt(&mut self, i: usize, j: usize) {
        self.order[i + 1..=j].reverse();
    }
}
