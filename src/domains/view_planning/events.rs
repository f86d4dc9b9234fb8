use super::assembler::SkipReason;
use super::cost_table::Cost;
use super::types::ObstacleId;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStage {
    /// One or more legs hit the expansion limit.
    Search,
    Optimizer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewPlanningEvent {
    PlanRequested {
        plan_id: String,
        obstacles: usize,
        timestamp: DateTime<Utc>,
    },
    ObstacleSkipped {
        plan_id: String,
        obstacle_id: ObstacleId,
        reason: SkipReason,
        timestamp: DateTime<Utc>,
    },
    BudgetExceeded {
        plan_id: String,
        stage: BudgetStage,
        timestamp: DateTime<Utc>,
    },
    PlanCompleted {
        plan_id: String,
        visited: Vec<ObstacleId>,
        cost: Cost,
        partial: bool,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for ViewPlanningEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ViewPlanningEvent::PlanRequested { .. } => "PlanRequested",
            ViewPlanningEvent::ObstacleSkipped { .. } => "ObstacleSkipped",
            ViewPlanningEvent::BudgetExceeded { .. } => "BudgetExceeded",
            ViewPlanningEvent::PlanCompleted { .. } => "PlanCompleted",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            ViewPlanningEvent::PlanRequested { plan_id, .. } => plan_id,
            ViewPlanningEvent::ObstacleSkipped { plan_id, .. } => plan_id,
            ViewPlanningEvent::BudgetExceeded { plan_id, .. } => plan_id,
            ViewPlanningEvent::PlanCompleted { plan_id, .. } => plan_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ViewPlanningEvent::PlanRequested { timestamp, .. } => *timestamp,
            ViewPlanningEvent::ObstacleSkipped { timestamp, .. } => *timestamp,
            ViewPlanningEvent::BudgetExceeded { timestamp, .. } => *timestamp,
            ViewPlanningEvent::PlanCompleted { timestamp, .. } => *timestamp,
        }
    }
}
