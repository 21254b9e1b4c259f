//! Import sections and import planning.

mod planner;
mod table;

pub use planner::{ImportPlan, ImportPlanner};
pub use table::ImportTable;
