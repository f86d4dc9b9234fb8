pub mod view_planning_service;

pub use view_planning_service::*;
