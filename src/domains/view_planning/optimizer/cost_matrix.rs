use crate::domains::view_planning::cost_table::Cost;
use crate::domains::view_planning::path::Path;
use crate::domains::view_planning::search::{SearchStats, StateSpaceSearch};
use crate::domains::view_planning::types::{Obstacle, RobotState};
use crate::domains::view_planning::view_states::ViewState;
use rayon::prelude::*;
use tracing::debug;

/// Node index of the start pose. Candidate view states follow from 1.
pub const START: usize = 0;

/// All candidates of one obstacle. The optimizer picks at most one.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub obstacle: Obstacle,
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone)]
struct LegRow {
    legs: Vec<Option<Path>>,
    stats: SearchStats,
    /// Targets whose leg from this row stopped at the expansion limit.
    budget_exceeded: Vec<usize>,
}

/// Pairwise optimal legs between the start and every candidate view state.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    start: RobotState,
    views: Vec<ViewState>,
    cluster_of: Vec<Option<usize>>,
    clusters: Vec<Cluster>,
    legs: Vec<Vec<Option<Path>>>,
    stats: SearchStats,
    budget_exceeded_legs: usize,
    budget_limited: Vec<bool>,
}

impl CostMatrix {
    /// Runs one search per ordered pair of nodes in different clusters.
    ///
    /// `targets` must only hold obstacles with at least one candidate.
    pub fn build(
        search: &StateSpaceSearch<'_>,
        start: RobotState,
        targets: Vec<(Obstacle, Vec<ViewState>)>,
        parallel: bool,
    ) -> Self {
        let mut views = Vec::new();
        let mut cluster_of = vec![None];
        let mut clusters = Vec::with_capacity(targets.len());
        for (index, (obstacle, candidates)) in targets.into_iter().enumerate() {
            let mut nodes = Vec::with_capacity(candidates.len());
            for view in candidates {
                views.push(view);
                cluster_of.push(Some(index));
                nodes.push(views.len());
            }
            clusters.push(Cluster { obstacle, nodes });
        }

        let mut matrix = Self {
            start,
            views,
            cluster_of,
            clusters,
            legs: Vec::new(),
            stats: SearchStats::default(),
            budget_exceeded_legs: 0,
            budget_limited: Vec::new(),
        };

        let node_count = matrix.node_count();
        let rows: Vec<LegRow> = if parallel {
            (0..node_count)
                .into_par_iter()
                .map(|from| matrix.compute_row(search, from))
                .collect()
        } else {
            (0..node_count).map(|from| matrix.compute_row(search, from)).collect()
        };

        matrix.budget_limited = vec![false; node_count];
        for row in rows {
            matrix.stats.absorb(row.stats);
            matrix.budget_exceeded_legs += row.budget_exceeded.len();
            for to in row.budget_exceeded {
                matrix.budget_limited[to] = true;
            }
            matrix.legs.push(row.legs);
        }

        debug!(
            nodes = node_count,
            clusters = matrix.clusters.len(),
            expanded = matrix.stats.expanded,
            budget_exceeded = matrix.budget_exceeded_legs,
            "cost matrix built"
        );
        matrix
    }

    fn compute_row(&self, search: &StateSpaceSearch<'_>, from: usize) -> LegRow {
        let mut row = LegRow {
            legs: Vec::with_capacity(self.node_count()),
            stats: SearchStats::default(),
            budget_exceeded: Vec::new(),
        };
        for to in 0..self.node_count() {
            if !self.needs_leg(from, to) {
                row.legs.push(None);
                continue;
            }
            let outcome = search.find_path(self.state(from), self.state(to));
            row.stats.absorb(outcome.stats());
            if outcome.is_budget_exceeded() {
                row.budget_exceeded.push(to);
            }
            row.legs.push(outcome.into_path());
        }
        row
    }

    fn needs_leg(&self, from: usize, to: usize) -> bool {
        to != START && from != to && self.cluster_of[from] != self.cluster_of[to]
    }

    pub fn start(&self) -> RobotState {
        self.start
    }

    /// Start plus every candidate.
    pub fn node_count(&self) -> usize {
        self.views.len() + 1
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn cluster_of(&self, node: usize) -> Option<usize> {
        self.cluster_of.get(node).copied().flatten()
    }

    pub fn view(&self, node: usize) -> Option<&ViewState> {
        node.checked_sub(1).and_then(|i| self.views.get(i))
    }

    pub fn state(&self, node: usize) -> RobotState {
        self.view(node).map(|v| v.state).unwrap_or(self.start)
    }

    pub fn penalty(&self, node: usize) -> Cost {
        self.view(node).map(|v| v.penalty).unwrap_or(0)
    }

    pub fn leg(&self, from: usize, to: usize) -> Option<&Path> {
        self.legs.get(from)?.get(to)?.as_ref()
    }

    pub fn leg_cost(&self, from: usize, to: usize) -> Option<Cost> {
        self.leg(from, to).map(|p| p.cost)
    }

    /// Leg cost plus the quality penalty of the arrival pose.
    pub fn arrival_cost(&self, from: usize, to: usize) -> Option<Cost> {
        self.leg_cost(from, to).map(|c| c + self.penalty(to))
    }

    /// Objective of visiting `nodes` in order from the start, `None` if any leg is missing.
    pub fn tour_cost(&self, nodes: &[usize]) -> Option<Cost> {
        let mut total = 0;
        let mut from = START;
        for &to in nodes {
            total += self.arrival_cost(from, to)?;
            from = to;
        }
        Some(total)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn budget_exceeded_legs(&self) -> usize {
        self.budget_exceeded_legs
    }

    /// Whether a leg into any candidate of `cluster` was cut off by the expansion limit.
    pub fn cluster_budget_limited(&self, cluster: usize) -> bool {
        self.clusters.get(cluster).is_some_and(|c| {
            c.nodes
                .iter()
                .any(|&node| self.budget_limited.get(node).copied().unwrap_or(false))
        })
    }

    /// Whether some node, start included, has a leg into a candidate of `cluster`.
    pub fn cluster_has_entry(&self, cluster: usize) -> bool {
        self.clusters.get(cluster).is_some_and(|c| {
            c.nodes
                .iter()
                .any(|&to| (0..self.node_count()).any(|from| self.leg(from, to).is_some()))
        })
    }
}

#[cfg(test)]
impl CostMatrix {
    /// One candidate per cluster with node `i` in cluster `i - 1`; `costs[from][to]` gives each leg.
    pub(crate) fn from_leg_costs(costs: Vec<Vec<Option<Cost>>>) -> Self {
        use crate::domains::view_planning::types::Heading;

        let start = RobotState::new(0, 0, Heading::North);
        let candidates = costs.len().saturating_sub(1);
        let mut views = Vec::with_capacity(candidates);
        let mut cluster_of = vec![None];
        let mut clusters = Vec::with_capacity(candidates);
        for index in 0..candidates {
            let id = index as u32 + 1;
            let state = RobotState::new(id as i32, 0, Heading::North);
            views.push(ViewState {
                obstacle_id: id,
                state,
                penalty: 0,
            });
            cluster_of.push(Some(index));
            clusters.push(Cluster {
                obstacle: Obstacle::new(id, id as i32, 4, Heading::South),
                nodes: vec![index + 1],
            });
        }

        let legs = costs
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cost| {
                        cost.map(|cost| Path {
                            cost,
                            ..Path::new(start)
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            start,
            views,
            cluster_of,
            clusters,
            legs,
            stats: SearchStats::default(),
            budget_exceeded_legs: 0,
            budget_limited: vec![false; candidates + 1],
        }
    }
}
