use serde::{Deserialize, Serialize};

pub type Cost = u64;

/// Cells displaced by a manoeuvre: `major` along the dominant axis, `minor` across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCells {
    pub major: i32,
    pub minor: i32,
}

/// Hardware-tuned costs and clearances. Multipliers apply to a unit step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    pub turn_cost: Cost,
    pub half_turn_cost: Cost,
    pub reverse_cost: Cost,
    /// Flat surcharge on every quarter turn.
    pub turn_surcharge: Cost,
    /// Added when a step ends next to an occupied cell.
    pub proximity_cost: Cost,
    pub off_center_cost: Cost,
    pub too_close_cost: Cost,
    pub turn_padding: f64,
    pub mid_turn_padding: f64,
    pub half_turn_padding: i32,
    pub clearance: u32,
    pub proximity_padding: u32,
    pub turn_cells: AxisCells,
    pub half_turn_cells: AxisCells,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            turn_cost: 6,
            half_turn_cost: 10,
            reverse_cost: 3,
            turn_surcharge: 10,
            proximity_cost: 1000,
            off_center_cost: 100,
            too_close_cost: 50,
            turn_padding: 2.0,
            mid_turn_padding: 2.0,
            half_turn_padding: 2,
            clearance: 2,
            proximity_padding: 2,
            turn_cells: AxisCells { major: 5, minor: 3 },
            half_turn_cells: AxisCells { major: 4, minor: 1 },
        }
    }
}
