use super::cost_table::CostTable;
use super::motion::{MotionKind, Transition};
use super::types::{Arena, Cell, Obstacle};
use crate::common::{DomainError, DomainResult};
use std::collections::HashSet;

/// Immutable occupancy snapshot with the robot's clearance rules.
///
/// All queries are total: anything outside the arena is simply infeasible.
#[derive(Debug, Clone)]
pub struct GridModel {
    width: i32,
    height: i32,
    obstacles: Vec<Obstacle>,
    occupied: Vec<Cell>,
    occupied_set: HashSet<Cell>,
    clearance: u32,
    proximity_padding: u32,
    turn_padding: f64,
    mid_turn_padding: f64,
    half_turn_padding: i32,
}

impl GridModel {
    pub fn new(arena: &Arena, costs: &CostTable) -> DomainResult<Self> {
        if arena.width <= 0 || arena.height <= 0 {
            return Err(DomainError::InvalidArena {
                reason: format!("grid must be non-empty, got {}x{}", arena.width, arena.height),
            });
        }

        let mut obstacles: Vec<Obstacle> = Vec::with_capacity(arena.obstacles.len());
        for obstacle in &arena.obstacles {
            if let Some(existing) = obstacles.iter().find(|o| o.id == obstacle.id) {
                if existing == obstacle {
                    continue;
                }
                return Err(DomainError::InvalidArena {
                    reason: format!("obstacle id {} is used twice", obstacle.id),
                });
            }
            if obstacles.iter().any(|o| o.cell == obstacle.cell && o.face == obstacle.face) {
                continue;
            }
            obstacles.push(obstacle.clone());
        }

        let mut occupied_set = HashSet::new();
        let mut occupied = Vec::new();
        for cell in obstacles.iter().map(|o| o.cell).chain(arena.walls.iter().copied()) {
            if occupied_set.insert(cell) {
                occupied.push(cell);
            }
        }

        Ok(Self {
            width: arena.width,
            height: arena.height,
            obstacles,
            occupied,
            occupied_set,
            clearance: costs.clearance,
            proximity_padding: costs.proximity_padding,
            turn_padding: costs.turn_padding,
            mid_turn_padding: costs.mid_turn_padding,
            half_turn_padding: costs.half_turn_padding,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupied_set.contains(&cell)
    }

    /// Whether the robot body fits on `cell`.
    pub fn is_free(&self, cell: Cell) -> bool {
        if !self.in_bounds(cell) {
            return false;
        }
        self.occupied
            .iter()
            .all(|o| o.manhattan(cell) > self.clearance && o.chebyshev(cell) >= self.clearance)
    }

    pub fn is_near_occupied(&self, cell: Cell) -> bool {
        self.occupied
            .iter()
            .any(|o| o.chebyshev(cell) <= self.proximity_padding)
    }

    /// Whether every cell swept by the transition, turning clearance included, is free.
    pub fn is_traversable(&self, transition: &Transition) -> bool {
        if !self.in_bounds(transition.from.cell) || !self.is_free(transition.to.cell) {
            return false;
        }
        match transition.motion.kind() {
            MotionKind::Straight => true,
            MotionKind::Turn => self.turn_clear(transition),
            MotionKind::HalfTurn => self.half_turn_clear(transition.from.cell, transition.to.cell),
        }
    }

    fn turn_clear(&self, transition: &Transition) -> bool {
        let (x, y) = (transition.from.cell.x as f64, transition.from.cell.y as f64);
        let (nx, ny) = (transition.to.cell.x as f64, transition.to.cell.y as f64);
        let checkpoints = turn_checkpoints((x, y), (nx, ny), transition.from.heading.is_vertical());

        self.occupied.iter().all(|o| {
            let o = (o.x as f64, o.y as f64);
            distance(o, (x, y)) >= self.turn_padding
                && distance(o, (nx, ny)) >= self.turn_padding
                && checkpoints.iter().all(|p| distance(o, *p) >= self.mid_turn_padding)
        })
    }

    fn half_turn_clear(&self, from: Cell, to: Cell) -> bool {
        let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
        let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
        let pad = self.half_turn_padding;
        let x_major = x1 - x0 > y1 - y0;

        !self.occupied.iter().any(|o| {
            if x_major {
                (x0..=x1).contains(&o.x) && (y0 - pad..=y1 + pad).contains(&o.y)
            } else {
                (x0 - pad..=x1 + pad).contains(&o.x) && (y0..=y1).contains(&o.y)
            }
        })
    }
}

/// Three points hugging the arc between `start` and `end`.
fn turn_checkpoints(start: (f64, f64), end: (f64, f64), vertical_start: bool) -> [(f64, f64); 3] {
    let (x, y) = start;
    let (nx, ny) = end;
    let (mx, my) = ((x + nx) / 2.0, (y + ny) / 2.0);
    if vertical_start {
        let (tx, ty) = (x, ny);
        [
            ((x + mx) / 2.0, my),
            ((tx + mx) / 2.0, (ty + my) / 2.0),
            (mx, (ny + my) / 2.0),
        ]
    } else {
        let (tx, ty) = (nx, y);
        [
            (mx, (y + my) / 2.0),
            ((tx + mx) / 2.0, (ty + my) / 2.0),
            ((nx + mx) / 2.0, my),
        ]
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
