//! Visit ordering as a generalized, asymmetric, open travelling-salesman problem.
//!
//! Each obstacle is a cluster of candidate view states. A tour starts at the
//! robot's start pose, enters at most one candidate per cluster and never returns.

pub mod cost_matrix;
pub mod exhaustive;
pub mod local_search;

pub use cost_matrix::{Cluster, CostMatrix, START};
pub use exhaustive::ExhaustiveStrategy;
pub use local_search::LocalSearchStrategy;

use super::cost_table::Cost;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Exact up to `exhaustive_threshold` obstacles, local search beyond.
    #[default]
    Auto,
    Exhaustive,
    LocalSearch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub mode: StrategyMode,
    pub exhaustive_threshold: usize,
    /// Largest (subset, candidate) table the exact strategy may allocate. Bigger
    /// instances use local search even when `mode` asks for the exact one.
    pub exhaustive_max_states: usize,
    pub time_budget_ms: Option<u64>,
    /// Cap on tour evaluations during improvement.
    pub max_iterations: usize,
    pub restarts: usize,
    pub seed: u64,
    pub parallel_cost_matrix: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mode: StrategyMode::Auto,
            exhaustive_threshold: 8,
            exhaustive_max_states: 1 << 22,
            time_budget_ms: None,
            max_iterations: 50_000,
            restarts: 4,
            seed: 0x5eed,
            parallel_cost_matrix: true,
        }
    }
}

/// Chosen visiting sequence: matrix nodes in order, start excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tour {
    pub nodes: Vec<usize>,
    pub cost: Cost,
    pub partial: bool,
}

impl Tour {
    pub fn visited(&self) -> usize {
        self.nodes.len()
    }

    /// More obstacles first, then lower cost.
    pub fn is_better_than(&self, other: &Tour) -> bool {
        self.visited() > other.visited() || (self.visited() == other.visited() && self.cost < other.cost)
    }
}

/// Wall-clock deadline plus an evaluation cap, shared by all strategies.
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    max_iterations: usize,
}

impl SearchBudget {
    pub fn new(time_budget: Option<Duration>, max_iterations: usize) -> Self {
        Self {
            deadline: time_budget.map(|d| Instant::now() + d),
            max_iterations,
        }
    }

    pub fn unlimited() -> Self {
        Self {
            deadline: None,
            max_iterations: usize::MAX,
        }
    }

    pub fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn exhausted(&self, iterations: usize) -> bool {
        iterations >= self.max_iterations || self.timed_out()
    }
}

pub trait OrderingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best tour found within `budget`. Never fails: an empty tour is valid.
    fn solve(&self, matrix: &CostMatrix, budget: &SearchBudget) -> Tour;
}

/// Result of one optimization run.
#[derive(Debug, Clone)]
pub struct OrderedVisits {
    pub tour: Tour,
    pub strategy: &'static str,
}

pub struct VisitOrderOptimizer {
    config: OptimizerConfig,
}

impl VisitOrderOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn strategy_for(&self, matrix: &CostMatrix) -> Box<dyn OrderingStrategy> {
        let clusters = matrix.cluster_count();
        let exhaustive = match self.config.mode {
            StrategyMode::Exhaustive => true,
            StrategyMode::LocalSearch => false,
            StrategyMode::Auto => clusters <= self.config.exhaustive_threshold,
        };
        if exhaustive && !ExhaustiveStrategy::fits(matrix, self.config.exhaustive_max_states) {
            warn!(
                clusters,
                nodes = matrix.node_count(),
                max_states = self.config.exhaustive_max_states,
                "instance too large for the exact strategy, using local search"
            );
            return self.local_search();
        }
        if exhaustive {
            Box::new(ExhaustiveStrategy)
        } else {
            self.local_search()
        }
    }

    fn local_search(&self) -> Box<dyn OrderingStrategy> {
        Box::new(LocalSearchStrategy::new(self.config.restarts, self.config.seed))
    }

    pub fn optimize(&self, matrix: &CostMatrix) -> OrderedVisits {
        let strategy = self.strategy_for(matrix);
        let budget = SearchBudget::new(
            self.config.time_budget_ms.map(Duration::from_millis),
            self.config.max_iterations,
        );
        let tour = strategy.solve(matrix, &budget);
        if tour.partial {
            warn!(strategy = strategy.name(), cost = tour.cost, "optimizer budget exhausted, returning best so far");
        }
        debug!(
            strategy = strategy.name(),
            visited = tour.visited(),
            clusters = matrix.cluster_count(),
            cost = tour.cost,
            "visit order chosen"
        );
        OrderedVisits {
            tour,
            strategy: strategy.name(),
        }
    }
}
