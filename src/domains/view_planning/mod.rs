//! Route planning for a grid-confined camera robot.
//!
//! The pipeline is leaf-first: [`grid`] and [`motion`] define what the robot can
//! do, [`search`] finds single legs, [`view_states`] proposes camera poses,
//! [`optimizer`] picks poses and their order, and [`assembler`] stitches the
//! legs into one path. [`planner::ViewPlanner`] runs the whole thing.

pub mod assembler;
pub mod cost_table;
pub mod events;
pub mod grid;
pub mod motion;
pub mod optimizer;
pub mod path;
pub mod planner;
pub mod ports;
pub mod search;
pub mod types;
pub mod view_states;

pub use assembler::*;
pub use cost_table::*;
pub use events::*;
pub use grid::*;
pub use motion::*;
pub use optimizer::{CostMatrix, OptimizerConfig, OrderingStrategy, StrategyMode, Tour, VisitOrderOptimizer};
pub use path::*;
pub use planner::*;
pub use ports::*;
pub use search::*;
pub use types::*;
pub use view_states::*;
