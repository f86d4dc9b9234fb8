use super::cost_matrix::{CostMatrix, START};
use super::{OrderingStrategy, SearchBudget, Tour};
use crate::domains::view_planning::cost_table::Cost;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Nearest neighbour plus cheapest insertion, refined with 2-opt and relocation.
///
/// Moves act on the order of obstacles; the candidate inside each obstacle is
/// re-chosen optimally for every order that gets evaluated.
#[derive(Debug, Clone)]
pub struct LocalSearchStrategy {
    restarts: usize,
    seed: u64,
}

impl LocalSearchStrategy {
    pub fn new(restarts: usize, seed: u64) -> Self {
        Self { restarts, seed }
    }
}

impl Default for LocalSearchStrategy {
    fn default() -> Self {
        Self::new(4, 0x5eed)
    }
}

impl OrderingStrategy for LocalSearchStrategy {
    fn name(&self) -> &'static str {
        "local_search"
    }

    fn solve(&self, matrix: &CostMatrix, budget: &SearchBudget) -> Tour {
        let mut iterations = 0;
        let (order, cut_short) = construct(matrix, budget, &mut iterations);
        let Some(initial) = evaluate_order(matrix, &order) else {
            return Tour::default();
        };

        let (mut best_order, mut best, ran_out) = improve(matrix, order, initial, budget, &mut iterations);
        let mut exhausted = cut_short || ran_out;

        let mut rng = StdRng::seed_from_u64(self.seed);
        for restart in 0..self.restarts {
            if exhausted || best_order.len() < 3 {
                break;
            }
            let mut order = best_order.clone();
            perturb(&mut order, &mut rng);
            let Some(tour) = evaluate_order(matrix, &order) else {
                continue;
            };
            let (order, tour, ran_out) = improve(matrix, order, tour, budget, &mut iterations);
            exhausted = ran_out;
            if tour.cost < best.cost {
                trace!(restart, cost = tour.cost, "restart improved tour");
                best_order = order;
                best = tour;
            }
        }

        best.partial = exhausted;
        best
    }
}

/// Cheapest candidate choice for a fixed obstacle order, by dynamic programming
/// over the layered candidate graph. `None` if some layer cannot be reached.
pub fn evaluate_order(matrix: &CostMatrix, order: &[usize]) -> Option<Tour> {
    let mut layers: Vec<Vec<(usize, Cost, usize)>> = Vec::with_capacity(order.len());
    let mut previous: Vec<(usize, Cost)> = vec![(START, 0)];

    for &cluster in order {
        let mut layer = Vec::new();
        for &node in &matrix.clusters().get(cluster)?.nodes {
            let mut best: Option<(Cost, usize)> = None;
            for (parent, &(from, cost)) in previous.iter().enumerate() {
                let Some(arrival) = matrix.arrival_cost(from, node) else {
                    continue;
                };
                if best.map_or(true, |(known, _)| cost + arrival < known) {
                    best = Some((cost + arrival, parent));
                }
            }
            if let Some((cost, parent)) = best {
                layer.push((node, cost, parent));
            }
        }
        if layer.is_empty() {
            return None;
        }
        previous = layer.iter().map(|&(node, cost, _)| (node, cost)).collect();
        layers.push(layer);
    }

    let Some(last) = layers.last() else {
        return Some(Tour::default());
    };
    let (mut index, &(_, cost, _)) = last.iter().enumerate().min_by_key(|(_, entry)| entry.1)?;
    let mut nodes = vec![START; layers.len()];
    for depth in (0..layers.len()).rev() {
        let (node, _, parent) = layers[depth][index];
        nodes[depth] = node;
        index = parent;
    }

    Some(Tour {
        nodes,
        cost,
        partial: false,
    })
}

/// Construction only, no improvement. Used as the fallback when an exact run cannot proceed.
pub fn greedy_tour(matrix: &CostMatrix, budget: &SearchBudget) -> Tour {
    let mut iterations = 0;
    let (order, cut_short) = construct(matrix, budget, &mut iterations);
    let mut tour = evaluate_order(matrix, &order).unwrap_or_default();
    tour.partial = cut_short;
    tour
}

/// Obstacle order from the greedy walk and insertion. The flag is set when the
/// budget ran out with obstacles still waiting to be inserted.
fn construct(matrix: &CostMatrix, budget: &SearchBudget, iterations: &mut usize) -> (Vec<usize>, bool) {
    let mut remaining: Vec<usize> = (0..matrix.cluster_count()).collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = START;

    loop {
        let mut nearest: Option<(usize, usize, Cost)> = None;
        for &cluster in &remaining {
            for &node in &matrix.clusters()[cluster].nodes {
                let Some(arrival) = matrix.arrival_cost(current, node) else {
                    continue;
                };
                if nearest.map_or(true, |(_, _, known)| arrival < known) {
                    nearest = Some((cluster, node, arrival));
                }
            }
        }
        let Some((cluster, node, _)) = nearest else {
            break;
        };
        order.push(cluster);
        remaining.retain(|&c| c != cluster);
        current = node;
    }

    // Obstacles the greedy walk stranded may still fit earlier in the sequence.
    loop {
        let mut cheapest: Option<(usize, Vec<usize>, Cost)> = None;
        for &cluster in &remaining {
            for position in 0..=order.len() {
                if budget.exhausted(*iterations) {
                    return (order, true);
                }
                *iterations += 1;
                let mut candidate = order.clone();
                candidate.insert(position, cluster);
                let Some(tour) = evaluate_order(matrix, &candidate) else {
                    continue;
                };
                if cheapest.as_ref().map_or(true, |(_, _, known)| tour.cost < *known) {
                    cheapest = Some((cluster, candidate, tour.cost));
                }
            }
        }
        let Some((cluster, candidate, _)) = cheapest else {
            break;
        };
        order = candidate;
        remaining.retain(|&c| c != cluster);
    }

    (order, false)
}

/// First-improvement descent. The flag reports whether the budget cut it short.
fn improve(
    matrix: &CostMatrix,
    mut order: Vec<usize>,
    mut best: Tour,
    budget: &SearchBudget,
    iterations: &mut usize,
) -> (Vec<usize>, Tour, bool) {
    let len = order.len();
    if budget.exhausted(*iterations) {
        return (order, best, true);
    }

    'descent: loop {
        for i in 0..len {
            for j in 0..len {
                if i == j {
                    continue;
                }
                for candidate in neighbours(&order, i, j) {
                    if budget.exhausted(*iterations) {
                        return (order, best, true);
                    }
                    *iterations += 1;
                    if let Some(tour) = evaluate_order(matrix, &candidate) {
                        if tour.cost < best.cost {
                            order = candidate;
                            best = tour;
                            continue 'descent;
                        }
                    }
                }
            }
        }
        return (order, best, false);
    }
}

fn neighbours(order: &[usize], i: usize, j: usize) -> Vec<Vec<usize>> {
    let mut moves = Vec::with_capacity(2);
    if i < j {
        let mut reversed = order.to_vec();
        reversed[i..=j].reverse();
        moves.push(reversed);
    }
    let mut relocated = order.to_vec();
    let cluster = relocated.remove(i);
    relocated.insert(j, cluster);
    moves.push(relocated);
    moves
}

fn perturb(order: &mut [usize], rng: &mut StdRng) {
    let len = order.len();
    let (a, b) = (rng.gen_range(0..len), rng.gen_range(0..len));
    order.swap(a, b);
    let start = rng.gen_range(0..len);
    let end = rng.gen_range(start..len);
    order[start..=end].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_cover_reversal_and_relocation() {
        let moves = neighbours(&[0, 1, 2, 3], 1, 3);
        assert_eq!(moves, vec![vec![0, 3, 2, 1], vec![0, 2, 3, 1]]);

        let moves = neighbours(&[0, 1, 2, 3], 3, 0);
        assert_eq!(moves, vec![vec![3, 0, 1, 2]]);
    }

    /// Start reaches both; `a` is nearer but `b` cannot be reached from it.
    fn stranding_matrix() -> CostMatrix {
        CostMatrix::from_leg_costs(vec![
            vec![None, Some(1), Some(5)],
            vec![None, None, None],
            vec![None, Some(1), None],
        ])
    }

    #[test]
    fn test_insertion_recovers_stranded_cluster() {
        let matrix = stranding_matrix();
        let mut iterations = 0;
        let (order, cut_short) = construct(&matrix, &SearchBudget::unlimited(), &mut iterations);
        assert_eq!(order, vec![1, 0]);
        assert!(!cut_short);
        assert!(iterations > 0);

        let tour = LocalSearchStrategy::default().solve(&matrix, &SearchBudget::unlimited());
        assert_eq!(tour.nodes, vec![2, 1]);
        assert_eq!(tour.cost, 6);
        assert!(!tour.partial);
    }

    #[test]
    fn test_exhausted_budget_stops_insertion() {
        let matrix = stranding_matrix();
        let budget = SearchBudget::new(None, 0);
        let mut iterations = 0;
        let (order, cut_short) = construct(&matrix, &budget, &mut iterations);
        assert_eq!(order, vec![0]);
        assert!(cut_short);
        assert_eq!(iterations, 0);

        let greedy = greedy_tour(&matrix, &budget);
        assert_eq!(greedy.nodes, vec![1]);
        assert!(greedy.partial);

        let tour = LocalSearchStrategy::default().solve(&matrix, &budget);
        assert_eq!(tour.visited(), 1);
        assert!(tour.partial);
    }

    #[test]
    fn test_perturb_keeps_every_cluster() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut order = vec![4, 2, 0, 1, 3];
        for _ in 0..20 {
            perturb(&mut order, &mut rng);
        }
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }
}
