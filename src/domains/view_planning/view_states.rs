use super::cost_table::{Cost, CostTable};
use super::grid::GridModel;
use super::types::{Obstacle, ObstacleId, RobotState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Closest standoff, in cells from the obstacle, at which the camera still resolves the face.
    ///
    /// Centred candidates must also clear the obstacle itself, so the nearest one that
    /// can exist sits at `max(min_standoff, clearance + 1)`.
    pub min_standoff: i32,
    pub max_standoff: i32,
    /// Sideways offsets tried at `max_standoff`.
    pub lateral_span: i32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_standoff: 2,
            max_standoff: 4,
            lateral_span: 1,
        }
    }
}

/// Candidate pose for photographing one obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub obstacle_id: ObstacleId,
    pub state: RobotState,
    /// Intrinsic quality cost, added to the leg that reaches this pose.
    pub penalty: Cost,
}

pub struct ViewStateGenerator<'a> {
    grid: &'a GridModel,
    costs: &'a CostTable,
    config: &'a ViewConfig,
}

impl<'a> ViewStateGenerator<'a> {
    pub fn new(grid: &'a GridModel, costs: &'a CostTable, config: &'a ViewConfig) -> Self {
        Self { grid, costs, config }
    }

    /// Free poses facing the obstacle's image, closest centred first.
    pub fn candidates(&self, obstacle: &Obstacle) -> Vec<ViewState> {
        let face = obstacle.face;
        let heading = face.opposite();
        let (near, far) = (self.config.min_standoff, self.config.max_standoff.max(self.config.min_standoff));
        let depth = (far - near) as Cost;

        let mut views = Vec::new();
        for standoff in near..=far {
            let penalty = if depth == 0 {
                0
            } else {
                self.costs.too_close_cost * (far - standoff) as Cost / depth
            };
            views.push((obstacle.cell.offset(face, standoff), penalty));
        }
        for lateral in -self.config.lateral_span..=self.config.lateral_span {
            if lateral == 0 {
                continue;
            }
            let cell = obstacle.cell.offset(face, far).offset(face.right(), lateral);
            views.push((cell, self.costs.off_center_cost * lateral.unsigned_abs() as Cost));
        }

        views
            .into_iter()
            .filter(|(cell, _)| self.grid.is_free(*cell))
            .map(|(cell, penalty)| ViewState {
                obstacle_id: obstacle.id,
                state: RobotState { cell, heading },
                penalty,
            })
            .collect()
    }

    pub fn generate(&self) -> Vec<(Obstacle, Vec<ViewState>)> {
        self.grid
            .obstacles()
            .iter()
            .map(|o| (o.clone(), self.candidates(o)))
            .collect()
    }
}
