//! Best-first search over robot poses.
//!
//! Nodes are [`RobotState`]s, edges are feasible motion primitives. All search
//! bookkeeping is owned by a single call, so one engine can serve many threads.

use super::cost_table::Cost;
use super::grid::GridModel;
use super::motion::{Motion, MotionPrimitiveSet};
use super::path::{Path, PathStep};
use super::types::RobotState;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::trace;

/// What counts as arriving.
pub enum Goal<'a> {
    State(RobotState),
    AnyOf(&'a [RobotState]),
    Matching(&'a (dyn Fn(&RobotState) -> bool + Sync)),
}

impl Goal<'_> {
    pub fn is_goal(&self, state: &RobotState) -> bool {
        match self {
            Goal::State(goal) => goal == state,
            Goal::AnyOf(goals) => goals.contains(state),
            Goal::Matching(predicate) => predicate(state),
        }
    }

    fn remaining_cells(&self, state: &RobotState) -> u32 {
        match self {
            Goal::State(goal) => goal.cell.manhattan(state.cell),
            Goal::AnyOf(goals) => goals
                .iter()
                .map(|g| g.cell.manhattan(state.cell))
                .min()
                .unwrap_or(0),
            Goal::Matching(_) => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Expansion limit per query.
    pub max_expansions: usize,
    /// Disable to fall back to uniform-cost search.
    pub use_heuristic: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 200_000,
            use_heuristic: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
}

impl SearchStats {
    pub fn absorb(&mut self, other: SearchStats) {
        self.expanded += other.expanded;
        self.generated += other.generated;
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found { path: Path, stats: SearchStats },
    Unreachable { stats: SearchStats },
    BudgetExceeded { stats: SearchStats },
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn stats(&self) -> SearchStats {
        match self {
            SearchOutcome::Found { stats, .. }
            | SearchOutcome::Unreachable { stats }
            | SearchOutcome::BudgetExceeded { stats } => *stats,
        }
    }

    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, SearchOutcome::BudgetExceeded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: Cost,
    seq: u64,
    g: Cost,
    state: RobotState,
}

/// Single-pair planner bound to one grid snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StateSpaceSearch<'a> {
    grid: &'a GridModel,
    primitives: &'a MotionPrimitiveSet,
    config: &'a SearchConfig,
}

impl<'a> StateSpaceSearch<'a> {
    pub fn new(grid: &'a GridModel, primitives: &'a MotionPrimitiveSet, config: &'a SearchConfig) -> Self {
        Self {
            grid,
            primitives,
            config,
        }
    }

    pub fn grid(&self) -> &GridModel {
        self.grid
    }

    pub fn primitives(&self) -> &MotionPrimitiveSet {
        self.primitives
    }

    pub fn find_path(&self, start: RobotState, goal: RobotState) -> SearchOutcome {
        self.search(start, &Goal::State(goal))
    }

    pub fn search(&self, start: RobotState, goal: &Goal<'_>) -> SearchOutcome {
        let mut stats = SearchStats::default();
        if !self.grid.in_bounds(start.cell) {
            return SearchOutcome::Unreachable { stats };
        }

        let mut best: HashMap<RobotState, Cost> = HashMap::new();
        let mut parents: HashMap<RobotState, (RobotState, Motion, Cost)> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        let mut seq: u64 = 0;

        best.insert(start, 0);
        frontier.push(Reverse(FrontierEntry {
            priority: self.estimate(goal, &start),
            seq,
            g: 0,
            state: start,
        }));

        while let Some(Reverse(entry)) = frontier.pop() {
            let state = entry.state;
            if best.get(&state).is_some_and(|&g| entry.g > g) {
                continue;
            }
            if goal.is_goal(&state) {
                let path = reconstruct(start, state, &parents);
                trace!(expanded = stats.expanded, cost = path.cost, "search reached goal");
                return SearchOutcome::Found { path, stats };
            }
            if stats.expanded >= self.config.max_expansions {
                trace!(expanded = stats.expanded, "search budget exhausted");
                return SearchOutcome::BudgetExceeded { stats };
            }
            stats.expanded += 1;

            for transition in self.primitives.successors(self.grid, state) {
                let step_cost = self.primitives.step_cost(self.grid, &transition);
                let g = entry.g + step_cost;
                if best.get(&transition.to).is_some_and(|&known| known <= g) {
                    continue;
                }
                best.insert(transition.to, g);
                parents.insert(transition.to, (state, transition.motion, step_cost));
                seq += 1;
                stats.generated += 1;
                frontier.push(Reverse(FrontierEntry {
                    priority: g + self.estimate(goal, &transition.to),
                    seq,
                    g,
                    state: transition.to,
                }));
            }
        }

        SearchOutcome::Unreachable { stats }
    }

    fn estimate(&self, goal: &Goal<'_>, state: &RobotState) -> Cost {
        if !self.config.use_heuristic {
            return 0;
        }
        self.primitives.cost_lower_bound(goal.remaining_cells(state))
    }
}

fn reconstruct(
    start: RobotState,
    goal: RobotState,
    parents: &HashMap<RobotState, (RobotState, Motion, Cost)>,
) -> Path {
    let mut steps = Vec::new();
    let mut cursor = goal;
    while cursor != start {
        let Some(&(prev, motion, cost)) = parents.get(&cursor) else {
            break;
        };
        steps.push(PathStep {
            motion,
            to: cursor,
            cost,
        });
        cursor = prev;
    }
    steps.reverse();

    let mut path = Path::new(start);
    for step in steps {
        path.push(step);
    }
    path
}
