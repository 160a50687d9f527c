//! Angle tracking for one motor.
//!
//! The angle is kept as a whole step count within one revolution so that repeated
//! stepping never accumulates float error.

use crate::config::units::Degrees;
use crate::motion::Direction;

/// Estimated shaft position, integrated from issued steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Steps past zero, in `[0, steps_per_revolution)`.
    steps: u32,
    steps_per_revolution: u32,
    degrees_per_step: f64,
}

impl Position {
    /// Create a tracker at zero.
    #[inline]
    pub fn new(steps_per_revolution: u32) -> Self {
        let steps_per_revolution = steps_per_revolution.max(1);
        Self {
            steps: 0,
            steps_per_revolution,
            degrees_per_step: 360.0 / steps_per_revolution as f64,
        }
    }

    /// Current angle in `[0, 360)`.
    #[inline]
    pub fn degrees(&self) -> Degrees {
        Degrees(self.steps as f64 * self.degrees_per_step)
    }

    /// Steps past zero within the current revolution.
    #[inline]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Record one issued step.
    #[inline]
    pub fn advance(&mut self, direction: Direction) {
        let next = self.steps as i64 + direction.sign() as i64;
        self.steps = next.rem_euclid(self.steps_per_revolution as i64) as u32;
    }

    /// Declare the current shaft position to be zero.
    #[inline]
    pub fn set_zero(&mut self) {
        self.steps = 0;
    }
}
