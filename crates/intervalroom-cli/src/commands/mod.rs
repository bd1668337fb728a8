pub mod config;
pub mod plan;
pub mod play;

use std::path::Path;

use intervalroom_core::WorkoutPlan;

/// Read and parse a plan file. Validation is left to the caller.
pub fn load_plan(path: &Path) -> Result<WorkoutPlan, Box<dyn std::error::Error>> {
    WorkoutPlan::load(path).map_err(|e| format!("{}: {e}", path.display()).into())
}
