use super::cost_matrix::{CostMatrix, START};
use super::local_search::greedy_tour;
use super::{OrderingStrategy, SearchBudget, Tour};
use crate::domains::view_planning::cost_table::Cost;

const NO_PARENT: usize = usize::MAX;

/// Exact Held-Karp style programme over (visited clusters, last candidate).
///
/// Memory grows with `2^clusters * nodes`, so it is only selected for small instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveStrategy;

impl ExhaustiveStrategy {
    /// Entries in the (mask, node) table, `None` when the count overflows `usize`.
    pub fn table_size(clusters: usize, nodes: usize) -> Option<usize> {
        let clusters = u32::try_from(clusters).ok()?;
        1usize.checked_shl(clusters)?.checked_mul(nodes)
    }

    pub fn fits(matrix: &CostMatrix, max_states: usize) -> bool {
        Self::table_size(matrix.cluster_count(), matrix.node_count()).is_some_and(|size| size <= max_states)
    }
}

impl OrderingStrategy for ExhaustiveStrategy {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(&self, matrix: &CostMatrix, budget: &SearchBudget) -> Tour {
        let n = matrix.node_count();
        let k = matrix.cluster_count();
        let Some(size) = Self::table_size(k, n) else {
            let mut fallback = greedy_tour(matrix, budget);
            fallback.partial = true;
            return fallback;
        };
        let full = 1usize << k;
        let at = |mask: usize, node: usize| mask * n + node;

        let mut dp: Vec<Option<(Cost, usize)>> = vec![None; size];
        dp[at(0, START)] = Some((0, NO_PARENT));

        for mask in 0..full {
            if budget.timed_out() {
                let mut fallback = greedy_tour(matrix, budget);
                fallback.partial = true;
                return fallback;
            }
            for last in 0..n {
                let Some((cost, _)) = dp[at(mask, last)] else {
                    continue;
                };
                for (c, cluster) in matrix.clusters().iter().enumerate() {
                    if mask & (1 << c) != 0 {
                        continue;
                    }
                    let next_mask = mask | (1 << c);
                    for &next in &cluster.nodes {
                        let Some(arrival) = matrix.arrival_cost(last, next) else {
                            continue;
                        };
                        let candidate = cost + arrival;
                        let slot = &mut dp[at(next_mask, next)];
                        if slot.map_or(true, |(known, _)| candidate < known) {
                            *slot = Some((candidate, last));
                        }
                    }
                }
            }
        }

        // Most clusters covered wins, then cheapest; first found on exact ties.
        let mut best: Option<(u32, Cost, usize, usize)> = None;
        for mask in 0..full {
            for last in 0..n {
                let Some((cost, _)) = dp[at(mask, last)] else {
                    continue;
                };
                let covered = mask.count_ones();
                let better = best.map_or(true, |(bc, bcost, _, _)| covered > bc || (covered == bc && cost < bcost));
                if better {
                    best = Some((covered, cost, mask, last));
                }
            }
        }

        let Some((_, cost, mut mask, mut last)) = best else {
            return Tour::default();
        };
        let mut nodes = Vec::new();
        while last != START {
            nodes.push(last);
            let Some((_, prev)) = dp[at(mask, last)] else {
                break;
            };
            if let Some(cluster) = matrix.cluster_of(last) {
                mask &= !(1 << cluster);
            }
            last = prev;
        }
        nodes.reverse();

        Tour {
            nodes,
            cost,
            partial: false,
        }
    }
}
