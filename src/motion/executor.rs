//! Motion execution bookkeeping.

use super::angle::Direction;
use super::plan::MotionPlan;

/// Runtime state during motion execution.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    /// Total steps in the plan.
    total_steps: u32,

    /// Steps issued so far.
    current_step: u32,

    /// Travel direction.
    direction: Option<Direction>,
}

impl MotionExecutor {
    /// Create a new executor for a motion plan.
    pub fn new(plan: &MotionPlan) -> Self {
        Self {
            total_steps: if plan.is_empty() { 0 } else { plan.steps },
            current_step: 0,
            direction: plan.direction,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.total_steps
    }

    /// Get the number of steps issued.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Get the total number of steps.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.total_steps.saturating_sub(self.current_step)
    }

    /// Travel direction of the plan.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Record one issued step.
    ///
    /// Returns `true` if more steps remain.
    pub fn advance(&mut self) -> bool {
        if !self.is_complete() {
            self.current_step += 1;
        }
        !self.is_complete()
    }

    /// Get progress as a fraction (0.0 to 1.0).
    pub fn progress(&self) -> f32 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.current_step as f32 / self.total_steps as f32
        }
    }
}
