//! Concurrent motor runtime.
//!
//! A [`MotorUnit`] turns steps into bus writes, a [`MotionScheduler`] runs one command at a
//! time per motor on its own thread, and the [`Controller`] ties all motors of a
//! configuration to one shared [`RegisterBus`](crate::bus::RegisterBus).

mod controller;
mod delay;
mod position;
mod scheduler;
pub mod state;
mod unit;

pub use controller::Controller;
pub use delay::StdDelay;
pub use position::Position;
pub use scheduler::MotionScheduler;
pub use state::MotorState;
pub use unit::{MotionOutcome, MotorUnit, StepDrive};
