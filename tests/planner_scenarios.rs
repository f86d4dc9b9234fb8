use gryphon_vantage::domains::view_planning::{
    replay, Arena, BudgetStage, CapturePosition, Cell, CostTable, GridModel, Heading, MotionPrimitiveSet, Obstacle,
    OptimizerConfig, PlannerSettings, RobotState, SearchConfig, SkipReason, StrategyMode, ViewPlanner,
    ViewPlanningEvent, VisitStatus,
};
use gryphon_vantage::DomainError;

fn exhaustive_settings() -> PlannerSettings {
    PlannerSettings {
        optimizer: OptimizerConfig {
            mode: StrategyMode::Exhaustive,
            ..OptimizerConfig::default()
        },
        ..PlannerSettings::default()
    }
}

fn three_obstacle_arena() -> Arena {
    Arena::new(20, 20, RobotState::new(1, 1, Heading::North))
        .with_obstacle(Obstacle::new(1, 5, 15, Heading::South))
        .with_obstacle(Obstacle::new(2, 15, 15, Heading::South))
        .with_obstacle(Obstacle::new(3, 15, 5, Heading::West))
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_single_obstacle() {
        let arena = Arena::new(10, 10, RobotState::new(0, 0, Heading::East))
            .with_obstacle(Obstacle::new(1, 5, 5, Heading::South));
        let outcome = ViewPlanner::default().plan(&arena).unwrap();

        assert_eq!(outcome.itinerary.entries.len(), 1);
        let entry = &outcome.itinerary.entries[0];
        assert!(entry.is_reached());
        let view = entry.view.unwrap();

        let end = outcome.path.end();
        assert_eq!(end, view.state);
        assert_eq!(end.heading, Heading::North);
        assert_eq!(end.cell.x, 5);
        assert!(end.cell.y < 5);
        // Cheapest standoff once quality penalties are counted.
        assert_eq!(end.cell, Cell::new(5, 1));
        assert_eq!(outcome.cost, 101);
        assert_eq!(outcome.path.cost, 101);
        assert!(!outcome.partial);
        assert_eq!(outcome.strategy, "exhaustive");

        assert_eq!(outcome.path.captures.len(), 1);
        let capture = outcome.path.captures[0];
        assert_eq!(capture.obstacle_id, 1);
        assert_eq!(capture.position, CapturePosition::Center);
        assert_eq!(capture.state_index, outcome.path.len());
        assert_eq!(entry.status, VisitStatus::Reached { state_index: outcome.path.len() });
    }

    #[test]
    fn test_zero_obstacles() {
        let start = RobotState::new(3, 4, Heading::West);
        let outcome = ViewPlanner::default().plan(&Arena::new(10, 10, start)).unwrap();

        assert!(outcome.itinerary.entries.is_empty());
        assert_eq!(outcome.itinerary.start, start);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.path.states(), vec![start]);
        assert_eq!(outcome.path.cost, 0);
        assert_eq!(outcome.cost, 0);
        assert!(!outcome.partial);
    }

    #[test]
    fn test_obstacle_without_free_standoff_is_skipped() {
        let walls: Vec<Cell> = (8..=12).map(|x| Cell::new(x, 8)).collect();
        let arena = Arena::new(20, 20, RobotState::new(1, 1, Heading::East))
            .with_obstacle(Obstacle::new(1, 10, 10, Heading::South))
            .with_obstacle(Obstacle::new(2, 4, 16, Heading::East))
            .with_walls(walls);
        let outcome = ViewPlanner::new(exhaustive_settings()).plan(&arena).unwrap();

        let blocked = outcome.itinerary.entry(1).unwrap();
        assert_eq!(blocked.status, VisitStatus::Skipped { reason: SkipReason::NoViewState });
        assert!(blocked.view.is_none());

        assert_eq!(outcome.itinerary.visit_order(), vec![2]);
        assert_eq!(outcome.cost, 52);
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            ViewPlanningEvent::ObstacleSkipped { obstacle_id: 1, reason: SkipReason::NoViewState, .. }
        )));

        let grid = GridModel::new(&arena, &CostTable::default()).unwrap();
        outcome
            .path
            .validate(&grid, &MotionPrimitiveSet::new(CostTable::default()))
            .unwrap();
    }

    #[test]
    fn test_sealed_obstacle_is_skipped_as_unreachable() {
        let mut walls = Vec::new();
        for x in 7..=13 {
            for y in 3..=9 {
                if (x - 10_i32).abs().max((y - 6_i32).abs()) == 3 {
                    walls.push(Cell::new(x, y));
                }
            }
        }
        let arena = Arena::new(20, 20, RobotState::new(1, 1, Heading::East))
            .with_obstacle(Obstacle::new(1, 10, 10, Heading::South))
            .with_obstacle(Obstacle::new(2, 4, 16, Heading::East))
            .with_walls(walls);
        let outcome = ViewPlanner::new(exhaustive_settings()).plan(&arena).unwrap();

        let sealed = outcome.itinerary.entry(1).unwrap();
        assert_eq!(sealed.status, VisitStatus::Skipped { reason: SkipReason::Unreachable });
        assert_eq!(outcome.itinerary.visit_order(), vec![2]);
        assert_eq!(outcome.cost, 61);
        // Skipped entries come after the visited ones.
        assert!(outcome.itinerary.entries[0].is_reached());
        assert!(!outcome.partial);
    }

    #[test]
    fn test_ordering_matches_exhaustive_comparison() {
        let outcome = ViewPlanner::new(exhaustive_settings()).plan(&three_obstacle_arena()).unwrap();
        assert_eq!(outcome.itinerary.visit_order(), vec![3, 1, 2]);
        assert_eq!(outcome.cost, 116);

        let heuristic = ViewPlanner::new(PlannerSettings {
            optimizer: OptimizerConfig {
                mode: StrategyMode::LocalSearch,
                ..OptimizerConfig::default()
            },
            ..PlannerSettings::default()
        })
        .plan(&three_obstacle_arena())
        .unwrap();
        assert_eq!(heuristic.strategy, "local_search");
        assert_eq!(heuristic.cost, 116);
    }

    #[test]
    fn test_auto_mode_switches_at_threshold() {
        let arena = three_obstacle_arena();
        let grid = GridModel::new(&arena, &CostTable::default()).unwrap();
        let primitives = MotionPrimitiveSet::new(CostTable::default());
        let plan_with_threshold = |exhaustive_threshold| {
            let settings = PlannerSettings {
                optimizer: OptimizerConfig {
                    mode: StrategyMode::Auto,
                    exhaustive_threshold,
                    ..OptimizerConfig::default()
                },
                ..PlannerSettings::default()
            };
            ViewPlanner::new(settings).plan(&arena).unwrap()
        };

        let exact = plan_with_threshold(3);
        assert_eq!(exact.strategy, "exhaustive");

        let heuristic = plan_with_threshold(2);
        assert_eq!(heuristic.strategy, "local_search");
        assert_eq!(heuristic.itinerary.visit_order().len(), 3);
        assert_eq!(heuristic.cost, exact.cost);
        heuristic.path.validate(&grid, &primitives).unwrap();
        let states = replay(&grid, &primitives, heuristic.start, &heuristic.path.motions()).unwrap();
        assert_eq!(states, heuristic.path.states());
    }

    #[test]
    fn test_oversized_exact_table_uses_local_search() {
        let mut settings = exhaustive_settings();
        settings.optimizer.exhaustive_max_states = 16;
        settings.optimizer.time_budget_ms = Some(1000);
        let outcome = ViewPlanner::new(settings).plan(&three_obstacle_arena()).unwrap();

        assert_eq!(outcome.strategy, "local_search");
        assert_eq!(outcome.itinerary.visit_order(), vec![3, 1, 2]);
        assert_eq!(outcome.cost, 116);
    }

    #[test]
    fn test_path_replays_and_legs_join() {
        let arena = three_obstacle_arena();
        let outcome = ViewPlanner::default().plan(&arena).unwrap();
        let grid = GridModel::new(&arena, &CostTable::default()).unwrap();
        let primitives = MotionPrimitiveSet::new(CostTable::default());

        let states = replay(&grid, &primitives, outcome.start, &outcome.path.motions()).unwrap();
        assert_eq!(states, outcome.path.states());

        let penalties: u64 = outcome.itinerary.reached().map(|e| e.view.unwrap().penalty).sum();
        assert_eq!(outcome.cost, outcome.path.cost + penalties);

        for (capture, entry) in outcome.path.captures.iter().zip(outcome.itinerary.reached()) {
            assert_eq!(states[capture.state_index], entry.view.unwrap().state);
            assert_eq!(capture.obstacle_id, entry.obstacle_id);
        }
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let arena = three_obstacle_arena();
        let planner = ViewPlanner::default();
        let a = planner.plan(&arena).unwrap();
        let b = planner.plan(&arena).unwrap();

        assert_ne!(a.plan_id, b.plan_id);
        assert_eq!(a.path, b.path);
        assert_eq!(a.itinerary, b.itinerary);
        assert_eq!(a.cost, b.cost);
    }

    #[test]
    fn test_parallel_matrix_does_not_change_the_plan() {
        let arena = three_obstacle_arena();
        let mut settings = PlannerSettings::default();
        settings.optimizer.parallel_cost_matrix = false;
        let sequential = ViewPlanner::new(settings).plan(&arena).unwrap();
        let parallel = ViewPlanner::default().plan(&arena).unwrap();

        assert_eq!(sequential.path, parallel.path);
        assert_eq!(sequential.itinerary, parallel.itinerary);
        assert_eq!(sequential.stats, parallel.stats);
    }

    #[test]
    fn test_cheaper_turns_never_cost_more() {
        let arena = three_obstacle_arena();
        let plan_with_turn_cost = |turn_cost| {
            let mut settings = exhaustive_settings();
            settings.costs = CostTable {
                turn_cost,
                ..CostTable::default()
            };
            ViewPlanner::new(settings).plan(&arena).unwrap()
        };

        let cheap = plan_with_turn_cost(2);
        let default = plan_with_turn_cost(6);
        let dear = plan_with_turn_cost(12);

        assert_eq!(cheap.itinerary.visit_order().len(), 3);
        assert_eq!(dear.itinerary.visit_order().len(), 3);
        assert!(cheap.cost <= default.cost);
        assert!(default.cost <= dear.cost);
        assert_eq!((cheap.cost, default.cost, dear.cost), (84, 116, 148));
    }

    #[test]
    fn test_optimizer_time_budget_marks_plan_partial() {
        let mut settings = exhaustive_settings();
        settings.optimizer.time_budget_ms = Some(0);
        let outcome = ViewPlanner::new(settings).plan(&three_obstacle_arena()).unwrap();

        assert!(outcome.partial);
        assert_eq!(outcome.itinerary.visit_order().len(), 3);
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            ViewPlanningEvent::BudgetExceeded { stage: BudgetStage::Optimizer, .. }
        )));
        assert!(matches!(
            outcome.events.last(),
            Some(ViewPlanningEvent::PlanCompleted { partial: true, .. })
        ));
    }

    #[test]
    fn test_search_budget_skip_is_reported_as_budget() {
        let arena = Arena::new(10, 10, RobotState::new(0, 0, Heading::East))
            .with_obstacle(Obstacle::new(1, 5, 5, Heading::South));
        let settings = PlannerSettings {
            search: SearchConfig {
                max_expansions: 1,
                ..SearchConfig::default()
            },
            ..PlannerSettings::default()
        };
        let outcome = ViewPlanner::new(settings).plan(&arena).unwrap();

        assert!(outcome.partial);
        assert!(outcome.path.is_empty());
        assert_eq!(
            outcome.itinerary.entries[0].status,
            VisitStatus::Skipped { reason: SkipReason::BudgetExceeded }
        );
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            ViewPlanningEvent::ObstacleSkipped { obstacle_id: 1, reason: SkipReason::BudgetExceeded, .. }
        )));
        assert!(outcome.events.iter().any(|e| matches!(
            e,
            ViewPlanningEvent::BudgetExceeded { stage: BudgetStage::Search, .. }
        )));
    }

    #[test]
    fn test_start_outside_grid_is_rejected() {
        let arena = Arena::new(10, 10, RobotState::new(12, 0, Heading::East));
        let result = ViewPlanner::default().plan(&arena);
        assert!(matches!(result, Err(DomainError::InvalidArena { .. })));
    }

    #[test]
    fn test_events_bracket_the_run() {
        let outcome = ViewPlanner::default().plan(&three_obstacle_arena()).unwrap();
        assert!(matches!(
            outcome.events.first(),
            Some(ViewPlanningEvent::PlanRequested { obstacles: 3, .. })
        ));
        match outcome.events.last() {
            Some(ViewPlanningEvent::PlanCompleted { visited, cost, .. }) => {
                assert_eq!(visited, &vec![3, 1, 2]);
                assert_eq!(*cost, outcome.cost);
            }
            other => panic!("expected PlanCompleted, got {:?}", other),
        }
    }
}
