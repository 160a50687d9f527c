//! Motion module for shiftreg-stepper.
//!
//! Provides angle arithmetic, command resolution, and step bookkeeping.

mod angle;
mod executor;
mod plan;

pub use angle::{normalize, shortest_path, signum, Direction, FULL_TURN};
pub use executor::MotionExecutor;
pub use plan::{MotionCommand, MotionPlan};
