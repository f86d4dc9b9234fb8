use super::cost_table::{AxisCells, Cost, CostTable};
use super::grid::GridModel;
use super::types::{Cell, Heading, RobotState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Atomic manoeuvre the drive base can execute between two grid poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Forward,
    Reverse,
    ForwardLeftTurn,
    ForwardRightTurn,
    ReverseLeftTurn,
    ReverseRightTurn,
    ForwardOffsetLeft,
    ForwardOffsetRight,
    ReverseOffsetLeft,
    ReverseOffsetRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Straight,
    Turn,
    HalfTurn,
}

impl Motion {
    /// Expansion order used by the search; ties resolve in this order.
    pub const ALL: [Motion; 10] = [
        Motion::Forward,
        Motion::Reverse,
        Motion::ForwardLeftTurn,
        Motion::ForwardRightTurn,
        Motion::ReverseLeftTurn,
        Motion::ReverseRightTurn,
        Motion::ForwardOffsetLeft,
        Motion::ForwardOffsetRight,
        Motion::ReverseOffsetLeft,
        Motion::ReverseOffsetRight,
    ];

    pub fn kind(self) -> MotionKind {
        match self {
            Motion::Forward | Motion::Reverse => MotionKind::Straight,
            Motion::ForwardLeftTurn
            | Motion::ForwardRightTurn
            | Motion::ReverseLeftTurn
            | Motion::ReverseRightTurn => MotionKind::Turn,
            Motion::ForwardOffsetLeft
            | Motion::ForwardOffsetRight
            | Motion::ReverseOffsetLeft
            | Motion::ReverseOffsetRight => MotionKind::HalfTurn,
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Motion::Reverse
                | Motion::ReverseLeftTurn
                | Motion::ReverseRightTurn
                | Motion::ReverseOffsetLeft
                | Motion::ReverseOffsetRight
        )
    }

    /// The primitive that drives the same curve backwards, undoing this one.
    pub fn opposite(self) -> Motion {
        match self {
            Motion::Forward => Motion::Reverse,
            Motion::Reverse => Motion::Forward,
            Motion::ForwardLeftTurn => Motion::ReverseLeftTurn,
            Motion::ReverseLeftTurn => Motion::ForwardLeftTurn,
            Motion::ForwardRightTurn => Motion::ReverseRightTurn,
            Motion::ReverseRightTurn => Motion::ForwardRightTurn,
            Motion::ForwardOffsetLeft => Motion::ReverseOffsetRight,
            Motion::ReverseOffsetRight => Motion::ForwardOffsetLeft,
            Motion::ForwardOffsetRight => Motion::ReverseOffsetLeft,
            Motion::ReverseOffsetLeft => Motion::ForwardOffsetRight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Motion::Forward => "FORWARD",
            Motion::Reverse => "REVERSE",
            Motion::ForwardLeftTurn => "FORWARD_LEFT_TURN",
            Motion::ForwardRightTurn => "FORWARD_RIGHT_TURN",
            Motion::ReverseLeftTurn => "REVERSE_LEFT_TURN",
            Motion::ReverseRightTurn => "REVERSE_RIGHT_TURN",
            Motion::ForwardOffsetLeft => "FORWARD_OFFSET_LEFT",
            Motion::ForwardOffsetRight => "FORWARD_OFFSET_RIGHT",
            Motion::ReverseOffsetLeft => "REVERSE_OFFSET_LEFT",
            Motion::ReverseOffsetRight => "REVERSE_OFFSET_RIGHT",
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A motion applied to a concrete pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub motion: Motion,
    pub from: RobotState,
    pub to: RobotState,
}

/// The configured primitive set: displacements and base costs.
#[derive(Debug, Clone)]
pub struct MotionPrimitiveSet {
    costs: CostTable,
    min_cost_per_cell: f64,
}

impl MotionPrimitiveSet {
    pub fn new(costs: CostTable) -> Self {
        let mut set = Self {
            costs,
            min_cost_per_cell: 0.0,
        };
        set.min_cost_per_cell = Motion::ALL
            .iter()
            .filter_map(|m| {
                let cells = set.displacement_cells(*m);
                (cells > 0).then(|| set.base_cost(*m) as f64 / cells as f64)
            })
            .fold(f64::INFINITY, f64::min);
        if !set.min_cost_per_cell.is_finite() {
            set.min_cost_per_cell = 0.0;
        }
        set
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// Pose reached by executing `motion` from `from`, without any feasibility check.
    pub fn apply(&self, from: RobotState, motion: Motion) -> Transition {
        let h = from.heading;
        let turn = self.costs.turn_cells;
        let half = self.costs.half_turn_cells;
        let (cell, heading) = match motion {
            Motion::Forward => (from.cell.offset(h, 1), h),
            Motion::Reverse => (from.cell.offset(h, -1), h),
            Motion::ForwardLeftTurn => forward_turn(from.cell, h, h.left(), turn),
            Motion::ForwardRightTurn => forward_turn(from.cell, h, h.right(), turn),
            Motion::ReverseLeftTurn => reverse_turn(from.cell, h, h.right(), turn),
            Motion::ReverseRightTurn => reverse_turn(from.cell, h, h.left(), turn),
            Motion::ForwardOffsetLeft => (offset_move(from.cell, h, h.left(), half, 1), h),
            Motion::ForwardOffsetRight => (offset_move(from.cell, h, h.right(), half, 1), h),
            Motion::ReverseOffsetLeft => (offset_move(from.cell, h, h.left(), half, -1), h),
            Motion::ReverseOffsetRight => (offset_move(from.cell, h, h.right(), half, -1), h),
        };
        Transition {
            motion,
            from,
            to: RobotState { cell, heading },
        }
    }

    /// Feasible transitions out of `from`, in expansion order.
    pub fn successors<'a>(
        &'a self,
        grid: &'a GridModel,
        from: RobotState,
    ) -> impl Iterator<Item = Transition> + 'a {
        Motion::ALL
            .into_iter()
            .map(move |m| self.apply(from, m))
            .filter(move |t| grid.is_traversable(t))
    }

    /// Cost of a motion before any map-dependent surcharge.
    pub fn base_cost(&self, motion: Motion) -> Cost {
        let c = &self.costs;
        let rotation = if motion.kind() == MotionKind::Turn { c.turn_cost } else { 1 };
        let reverse = if motion.is_reverse() { c.reverse_cost } else { 1 };
        let half_turn = if motion.kind() == MotionKind::HalfTurn { c.half_turn_cost } else { 1 };
        let surcharge = if motion.kind() == MotionKind::Turn { c.turn_surcharge } else { 0 };
        rotation * reverse * half_turn + surcharge
    }

    pub fn step_cost(&self, grid: &GridModel, transition: &Transition) -> Cost {
        let mut cost = self.base_cost(transition.motion);
        if grid.is_near_occupied(transition.to.cell) {
            cost += self.costs.proximity_cost;
        }
        cost
    }

    /// Admissible lower bound on the cost of covering `manhattan` cells.
    pub fn cost_lower_bound(&self, manhattan: u32) -> Cost {
        (manhattan as f64 * self.min_cost_per_cell).floor() as Cost
    }

    fn displacement_cells(&self, motion: Motion) -> u32 {
        let origin = RobotState::new(0, 0, Heading::North);
        self.apply(origin, motion).to.cell.manhattan(origin.cell)
    }
}

fn forward_turn(from: Cell, old: Heading, new: Heading, cells: AxisCells) -> (Cell, Heading) {
    (from.offset(old, cells.minor).offset(new, cells.major), new)
}

fn reverse_turn(from: Cell, old: Heading, new: Heading, cells: AxisCells) -> (Cell, Heading) {
    (from.offset(old, -cells.major).offset(new, -cells.minor), new)
}

fn offset_move(from: Cell, heading: Heading, side: Heading, cells: AxisCells, sign: i32) -> Cell {
    from.offset(heading, sign * cells.major).offset(side, cells.minor)
}
