use super::cost_table::Cost;
use super::grid::GridModel;
use super::motion::{Motion, MotionPrimitiveSet};
use super::types::{Heading, Obstacle, ObstacleId, RobotState};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// One primitive application inside a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub motion: Motion,
    pub to: RobotState,
    pub cost: Cost,
}

/// Where the photographed face sits relative to the robot's heading axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapturePosition {
    Left,
    Center,
    Right,
}

impl CapturePosition {
    pub fn relative_to(state: RobotState, obstacle: &Obstacle) -> Self {
        let (dx, dy) = (obstacle.cell.x - state.cell.x, obstacle.cell.y - state.cell.y);
        // Rotate into the robot frame: `ahead` along the heading, `lateral` positive to the right.
        let (ahead, lateral) = match state.heading {
            Heading::North => (dy, dx),
            Heading::South => (-dy, -dx),
            Heading::East => (dx, -dy),
            Heading::West => (-dx, dy),
        };
        if lateral == 0 && ahead > 0 {
            CapturePosition::Center
        } else if lateral < 0 {
            CapturePosition::Left
        } else {
            CapturePosition::Right
        }
    }
}

/// A photograph to take once the robot reaches `state_index` on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub state_index: usize,
    pub obstacle_id: ObstacleId,
    pub position: CapturePosition,
}

/// Ordered poses joined by exactly one primitive each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub start: RobotState,
    pub steps: Vec<PathStep>,
    pub cost: Cost,
    #[serde(default)]
    pub captures: Vec<Capture>,
}

impl Path {
    pub fn new(start: RobotState) -> Self {
        Self {
            start,
            steps: Vec::new(),
            cost: 0,
            captures: Vec::new(),
        }
    }

    pub fn push(&mut self, step: PathStep) {
        self.cost += step.cost;
        self.steps.push(step);
    }

    pub fn end(&self) -> RobotState {
        self.steps.last().map(|s| s.to).unwrap_or(self.start)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn states(&self) -> Vec<RobotState> {
        std::iter::once(self.start)
            .chain(self.steps.iter().map(|s| s.to))
            .collect()
    }

    pub fn motions(&self) -> Vec<Motion> {
        self.steps.iter().map(|s| s.motion).collect()
    }

    /// Appends `leg`, which must begin where this path ends.
    pub fn extend_with(&mut self, leg_index: usize, leg: &Path) -> DomainResult<()> {
        if leg.start != self.end() {
            return Err(DomainError::PathDiscontinuity {
                leg: leg_index,
                expected: self.end().to_string(),
                actual: leg.start.to_string(),
            });
        }
        for step in &leg.steps {
            self.push(*step);
        }
        Ok(())
    }

    /// Checks that every step is a feasible primitive with the recorded cost.
    pub fn validate(&self, grid: &GridModel, primitives: &MotionPrimitiveSet) -> DomainResult<()> {
        let mut current = self.start;
        let mut total: Cost = 0;
        for (step_no, step) in self.steps.iter().enumerate() {
            let transition = primitives.apply(current, step.motion);
            if transition.to != step.to {
                return Err(DomainError::InvalidTransition {
                    step: step_no,
                    reason: format!("{} from {} lands on {}, not {}", step.motion, current, transition.to, step.to),
                });
            }
            if !grid.is_traversable(&transition) {
                return Err(DomainError::InvalidTransition {
                    step: step_no,
                    reason: format!("{} from {} is blocked", step.motion, current),
                });
            }
            let expected = primitives.step_cost(grid, &transition);
            if expected != step.cost {
                return Err(DomainError::InvalidTransition {
                    step: step_no,
                    reason: format!("recorded cost {} but primitive costs {}", step.cost, expected),
                });
            }
            total += step.cost;
            current = step.to;
        }
        if total != self.cost {
            return Err(DomainError::InvalidTransition {
                step: self.steps.len(),
                reason: format!("path cost {} does not match step sum {}", self.cost, total),
            });
        }
        Ok(())
    }
}

/// Re-executes a motion sequence against the grid, returning every pose visited.
pub fn replay(
    grid: &GridModel,
    primitives: &MotionPrimitiveSet,
    start: RobotState,
    motions: &[Motion],
) -> DomainResult<Vec<RobotState>> {
    let mut states = Vec::with_capacity(motions.len() + 1);
    states.push(start);
    let mut current = start;
    for (step, motion) in motions.iter().enumerate() {
        let transition = primitives.apply(current, *motion);
        if !grid.is_traversable(&transition) {
            return Err(DomainError::InvalidTransition {
                step,
                reason: format!("{} from {} is blocked", motion, current),
            });
        }
        current = transition.to;
        states.push(current);
    }
    Ok(states)
}
