pub mod logger;
pub mod view_planning;

pub use logger::*;
pub use view_planning::*;
