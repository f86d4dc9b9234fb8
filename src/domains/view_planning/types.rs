use serde::{Deserialize, Serialize};
use std::fmt;

pub type ObstacleId = u32;

/// Integer grid cell. `x` is the column (growing East), `y` the row (growing North).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by moving `steps` cells along `heading`.
    pub fn offset(self, heading: Heading, steps: i32) -> Self {
        let (dx, dy) = heading.delta();
        Self {
            x: self.x + dx * steps,
            y: self.y + dy * steps,
        }
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// 90° counter-clockwise.
    pub fn left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// 90° clockwise.
    pub fn right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub fn opposite(self) -> Self {
        self.left().left()
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Heading::North | Heading::South)
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heading::North => "N",
            Heading::East => "E",
            Heading::South => "S",
            Heading::West => "W",
        };
        f.write_str(s)
    }
}

/// Robot pose at grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotState {
    pub cell: Cell,
    pub heading: Heading,
}

impl RobotState {
    pub const fn new(x: i32, y: i32, heading: Heading) -> Self {
        Self {
            cell: Cell::new(x, y),
            heading,
        }
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.cell, self.heading)
    }
}

/// A target whose `face` side carries the image to photograph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub cell: Cell,
    pub face: Heading,
}

impl Obstacle {
    pub fn new(id: ObstacleId, x: i32, y: i32, face: Heading) -> Self {
        Self {
            id,
            cell: Cell::new(x, y),
            face,
        }
    }
}

/// Static planning input as delivered by map setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub start: RobotState,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Occupied cells without an image.
    #[serde(default)]
    pub walls: Vec<Cell>,
}

impl Arena {
    pub fn new(width: i32, height: i32, start: RobotState) -> Self {
        Self {
            width,
            height,
            start,
            obstacles: Vec::new(),
            walls: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with_walls<I: IntoIterator<Item = Cell>>(mut self, walls: I) -> Self {
        self.walls.extend(walls);
        self
    }
}
