use super::assembler::{Itinerary, PathAssembler, SkipReason, VisitStatus};
use super::cost_table::{Cost, CostTable};
use super::events::{BudgetStage, ViewPlanningEvent};
use super::grid::GridModel;
use super::motion::MotionPrimitiveSet;
use super::optimizer::{CostMatrix, OptimizerConfig, VisitOrderOptimizer};
use super::path::Path;
use super::search::{SearchConfig, SearchStats, StateSpaceSearch};
use super::types::{Arena, RobotState};
use super::view_states::{ViewConfig, ViewStateGenerator};
use crate::common::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Every tunable the engine reads during one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub costs: CostTable,
    pub views: ViewConfig,
    pub search: SearchConfig,
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub plan_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub start: RobotState,
    pub path: Path,
    pub itinerary: Itinerary,
    /// Leg costs plus the penalties of the chosen view states.
    pub cost: Cost,
    /// A search or optimizer budget ran out; the plan is the best found so far.
    pub partial: bool,
    pub strategy: String,
    pub stats: SearchStats,
    pub events: Vec<ViewPlanningEvent>,
}

/// Runs one complete planning pass over an immutable arena snapshot.
#[derive(Debug, Clone, Default)]
pub struct ViewPlanner {
    settings: PlannerSettings,
}

impl ViewPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn plan(&self, arena: &Arena) -> DomainResult<PlanOutcome> {
        self.plan_with_id(Uuid::new_v4(), arena)
    }

    pub fn plan_with_id(&self, plan_id: Uuid, arena: &Arena) -> DomainResult<PlanOutcome> {
        let settings = &self.settings;
        let grid = GridModel::new(arena, &settings.costs)?;
        if !grid.in_bounds(arena.start.cell) {
            return Err(DomainError::InvalidArena {
                reason: format!("start {} lies outside the {}x{} grid", arena.start, grid.width(), grid.height()),
            });
        }

        let id = plan_id.to_string();
        let mut events = vec![ViewPlanningEvent::PlanRequested {
            plan_id: id.clone(),
            obstacles: grid.obstacles().len(),
            timestamp: Utc::now(),
        }];

        let primitives = MotionPrimitiveSet::new(settings.costs.clone());
        let search = StateSpaceSearch::new(&grid, &primitives, &settings.search);

        let generator = ViewStateGenerator::new(&grid, &settings.costs, &settings.views);
        let (targets, unviewable): (Vec<_>, Vec<_>) = generator
            .generate()
            .into_iter()
            .partition(|(_, views)| !views.is_empty());
        for (obstacle, _) in &unviewable {
            warn!(plan_id = %id, obstacle = obstacle.id, "no free view state, skipping obstacle");
        }

        let matrix = CostMatrix::build(&search, arena.start, targets, settings.optimizer.parallel_cost_matrix);
        let mut partial = false;
        if matrix.budget_exceeded_legs() > 0 {
            warn!(plan_id = %id, legs = matrix.budget_exceeded_legs(), "search budget exhausted on some legs");
            partial = true;
            events.push(ViewPlanningEvent::BudgetExceeded {
                plan_id: id.clone(),
                stage: BudgetStage::Search,
                timestamp: Utc::now(),
            });
        }

        let ordered = VisitOrderOptimizer::new(settings.optimizer.clone()).optimize(&matrix);
        if ordered.tour.partial {
            partial = true;
            events.push(ViewPlanningEvent::BudgetExceeded {
                plan_id: id.clone(),
                stage: BudgetStage::Optimizer,
                timestamp: Utc::now(),
            });
        }

        let (path, itinerary) = PathAssembler::new(&matrix, &search).assemble(&ordered.tour, grid.obstacles())?;
        path.validate(&grid, &primitives)?;

        for entry in itinerary.skipped() {
            if let VisitStatus::Skipped { reason } = entry.status {
                match reason {
                    SkipReason::Unreachable => {
                        warn!(plan_id = %id, obstacle = entry.obstacle_id, "view states unreachable, skipping obstacle")
                    }
                    SkipReason::BudgetExceeded => {
                        warn!(plan_id = %id, obstacle = entry.obstacle_id, "budget exhausted before obstacle was reached")
                    }
                    SkipReason::NoViewState => {}
                }
                events.push(ViewPlanningEvent::ObstacleSkipped {
                    plan_id: id.clone(),
                    obstacle_id: entry.obstacle_id,
                    reason,
                    timestamp: Utc::now(),
                });
            }
        }

        let visited = itinerary.visit_order();
        info!(
            plan_id = %id,
            strategy = ordered.strategy,
            visited = visited.len(),
            obstacles = grid.obstacles().len(),
            cost = ordered.tour.cost,
            steps = path.len(),
            partial,
            "view plan completed"
        );
        events.push(ViewPlanningEvent::PlanCompleted {
            plan_id: id,
            visited,
            cost: ordered.tour.cost,
            partial,
            timestamp: Utc::now(),
        });

        Ok(PlanOutcome {
            plan_id,
            created_at: Utc::now(),
            start: arena.start,
            path,
            itinerary,
            cost: ordered.tour.cost,
            partial,
            strategy: ordered.strategy.to_string(),
            stats: matrix.stats(),
            events,
        })
    }
}
