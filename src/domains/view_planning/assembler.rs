use super::optimizer::{CostMatrix, Tour, START};
use super::path::{Capture, CapturePosition, Path};
use super::search::StateSpaceSearch;
use super::types::{Obstacle, ObstacleId, RobotState};
use super::view_states::ViewState;
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Every standoff cell is blocked or out of the arena.
    NoViewState,
    /// Candidates exist but none can be reached from any viable predecessor.
    Unreachable,
    /// A search or optimizer budget ran out before the obstacle could be fitted in.
    BudgetExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    /// `state_index` points into the assembled path's state sequence.
    Reached { state_index: usize },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryEntry {
    pub obstacle_id: ObstacleId,
    pub view: Option<ViewState>,
    pub status: VisitStatus,
}

impl ItineraryEntry {
    pub fn is_reached(&self) -> bool {
        matches!(self.status, VisitStatus::Reached { .. })
    }
}

/// Visited obstacles in tour order, then skipped ones in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub start: RobotState,
    pub entries: Vec<ItineraryEntry>,
}

impl Itinerary {
    pub fn reached(&self) -> impl Iterator<Item = &ItineraryEntry> {
        self.entries.iter().filter(|e| e.is_reached())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ItineraryEntry> {
        self.entries.iter().filter(|e| !e.is_reached())
    }

    pub fn visit_order(&self) -> Vec<ObstacleId> {
        self.reached().map(|e| e.obstacle_id).collect()
    }

    pub fn entry(&self, obstacle_id: ObstacleId) -> Option<&ItineraryEntry> {
        self.entries.iter().find(|e| e.obstacle_id == obstacle_id)
    }
}

/// Joins the legs of a chosen tour into one path.
pub struct PathAssembler<'a> {
    matrix: &'a CostMatrix,
    search: &'a StateSpaceSearch<'a>,
}

impl<'a> PathAssembler<'a> {
    pub fn new(matrix: &'a CostMatrix, search: &'a StateSpaceSearch<'a>) -> Self {
        Self { matrix, search }
    }

    /// `obstacles` is every target of the run, viewable or not.
    pub fn assemble(&self, tour: &Tour, obstacles: &[Obstacle]) -> DomainResult<(Path, Itinerary)> {
        let start = self.matrix.start();
        let mut path = Path::new(start);
        let mut entries = Vec::with_capacity(obstacles.len());
        let mut from = START;

        for (leg_index, &node) in tour.nodes.iter().enumerate() {
            let (view, obstacle) = self.target(node)?;
            let leg = self.leg(leg_index, from, node)?;
            path.extend_with(leg_index, &leg)?;

            let state_index = path.len();
            path.captures.push(Capture {
                state_index,
                obstacle_id: obstacle.id,
                position: CapturePosition::relative_to(view.state, obstacle),
            });
            entries.push(ItineraryEntry {
                obstacle_id: obstacle.id,
                view: Some(*view),
                status: VisitStatus::Reached { state_index },
            });
            from = node;
        }

        for obstacle in obstacles {
            if entries.iter().any(|e| e.obstacle_id == obstacle.id) {
                continue;
            }
            let reason = self.skip_reason(tour, obstacle);
            entries.push(ItineraryEntry {
                obstacle_id: obstacle.id,
                view: None,
                status: VisitStatus::Skipped { reason },
            });
        }

        Ok((path, Itinerary { start, entries }))
    }

    fn skip_reason(&self, tour: &Tour, obstacle: &Obstacle) -> SkipReason {
        let matrix = self.matrix;
        let Some(cluster) = matrix.clusters().iter().position(|c| c.obstacle.id == obstacle.id) else {
            return SkipReason::NoViewState;
        };
        if matrix.cluster_budget_limited(cluster) || (tour.partial && matrix.cluster_has_entry(cluster)) {
            SkipReason::BudgetExceeded
        } else {
            SkipReason::Unreachable
        }
    }

    fn target(&self, node: usize) -> DomainResult<(&'a ViewState, &'a Obstacle)> {
        let matrix = self.matrix;
        let view = matrix.view(node);
        let cluster = matrix.cluster_of(node).and_then(|c| matrix.clusters().get(c));
        match (view, cluster) {
            (Some(view), Some(cluster)) => Ok((view, &cluster.obstacle)),
            _ => Err(DomainError::InvalidCommand {
                reason: format!("tour references unknown node {}", node),
            }),
        }
    }

    /// Cached leg from the cost matrix, searched again if the matrix skipped it.
    fn leg(&self, leg_index: usize, from: usize, to: usize) -> DomainResult<Path> {
        if let Some(leg) = self.matrix.leg(from, to) {
            return Ok(leg.clone());
        }
        let (a, b) = (self.matrix.state(from), self.matrix.state(to));
        self.search
            .find_path(a, b)
            .into_path()
            .ok_or_else(|| DomainError::PathDiscontinuity {
                leg: leg_index,
                expected: b.to_string(),
                actual: format!("no path from {}", a),
            })
    }
}
