use crate::common::{ApplicationError, ApplicationResult, DomainError, EventEnvelope, EventMetadata};
use crate::domains::logger::DynLogger;
use crate::domains::view_planning::{
    Arena, ArenaSource, PlanOutcome, PlannerSettings, ViewPlanner, ViewPlanningEvent, VisitStatus,
};
use std::sync::Arc;
use tokio::sync::mpsc;

const AGGREGATE_TYPE: &str = "ViewPlan";
const EVENT_SOURCE: &str = "view_planning_service";

/// Async facade over the planner. Each request runs on the blocking pool
/// against its own grid snapshot.
pub struct ViewPlanningService {
    planner: Arc<ViewPlanner>,
    arena_source: Arc<dyn ArenaSource>,
    logger: DynLogger,
    event_sender: Option<mpsc::Sender<EventEnvelope>>,
}

impl ViewPlanningService {
    pub fn new(settings: PlannerSettings, arena_source: Arc<dyn ArenaSource>, logger: DynLogger) -> Self {
        Self {
            planner: Arc::new(ViewPlanner::new(settings)),
            arena_source,
            logger,
            event_sender: None,
        }
    }

    /// Publish planning events as envelopes on `sender`.
    pub fn with_event_sender(mut self, sender: mpsc::Sender<EventEnvelope>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub fn planner(&self) -> &ViewPlanner {
        &self.planner
    }

    pub fn available_arenas(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.arena_source.list_arenas()?)
    }

    pub async fn plan_named(&self, name: &str) -> ApplicationResult<PlanOutcome> {
        let arena = self.arena_source.load_arena(name).map_err(|e| {
            self.logger.error(&format!("failed to load arena {}: {}", name, e));
            e
        })?;
        self.plan(arena).await
    }

    pub async fn plan(&self, arena: Arena) -> ApplicationResult<PlanOutcome> {
        self.logger.info(&format!(
            "planning {} obstacles on a {}x{} arena from {}",
            arena.obstacles.len(),
            arena.width,
            arena.height,
            arena.start
        ));

        let planner = Arc::clone(&self.planner);
        let outcome = tokio::task::spawn_blocking(move || planner.plan(&arena))
            .await
            .map_err(|e| ApplicationError::Task(e.to_string()))?;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                self.logger.error(&format!("planning failed: {}", e));
                return Err(e.into());
            }
        };

        for entry in outcome.itinerary.skipped() {
            if let VisitStatus::Skipped { reason } = entry.status {
                self.logger
                    .warn(&format!("obstacle {} skipped: {:?}", entry.obstacle_id, reason));
            }
        }
        if outcome.partial {
            self.logger
                .warn(&format!("plan {} is partial, a budget ran out", outcome.plan_id));
        }
        self.logger.info(&format!(
            "plan {} visits {:?} in {} steps, cost {}",
            outcome.plan_id,
            outcome.itinerary.visit_order(),
            outcome.path.len(),
            outcome.cost
        ));

        self.publish(&outcome.events).await?;
        Ok(outcome)
    }

    async fn publish(&self, events: &[ViewPlanningEvent]) -> ApplicationResult<()> {
        let Some(sender) = &self.event_sender else {
            return Ok(());
        };
        for event in events {
            let envelope = EventEnvelope::new(event, AGGREGATE_TYPE, EventMetadata::from_source(EVENT_SOURCE))
                .map_err(DomainError::from)?;
            if sender.send(envelope).await.is_err() {
                self.logger.warn("event receiver dropped, discarding remaining events");
                break;
            }
        }
        Ok(())
    }
}
