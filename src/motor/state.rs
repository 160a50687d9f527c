//! Scheduler state of a motor.

use core::fmt;

/// Whether a motion command is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotorState {
    /// No command running; the next one starts immediately.
    #[default]
    Idle,
    /// A command's step loop is running.
    Moving,
}

impl MotorState {
    /// Get the state name for logging.
    pub fn name(self) -> &'static str {
        match self {
            MotorState::Idle => "Idle",
            MotorState::Moving => "Moving",
        }
    }
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
