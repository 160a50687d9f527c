//! Motion commands and their resolution into step counts.

use crate::config::units::Degrees;
use crate::error::MotionError;

use super::angle::{normalize, shortest_path, Direction};

/// A requested angular move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    /// Rotate by a signed relative amount.
    Rotate(Degrees),
    /// Go to an absolute angle by the shortest path.
    GoTo(Degrees),
}

impl MotionCommand {
    /// The angle carried by the command.
    #[inline]
    pub fn angle(&self) -> Degrees {
        match *self {
            MotionCommand::Rotate(d) | MotionCommand::GoTo(d) => d,
        }
    }

    /// Reject NaN and infinite angles.
    pub fn validate(&self) -> Result<(), MotionError> {
        let angle = self.angle();
        if angle.is_finite() {
            Ok(())
        } else {
            Err(MotionError::InvalidAngle(angle.0))
        }
    }

    /// Resolve into a plan against the motor's `current` angle.
    ///
    /// Absolute targets become a relative delta here, once; the plan never re-reads the angle.
    pub fn resolve(self, current: Degrees, steps_per_degree: f64) -> Result<MotionPlan, MotionError> {
        self.validate()?;
        let delta = match self {
            MotionCommand::Rotate(delta) => delta,
            MotionCommand::GoTo(target) => shortest_path(normalize(current), normalize(target)),
        };
        MotionPlan::from_delta(delta, steps_per_degree)
    }
}

/// A resolved relative move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    /// Signed angular distance requested.
    pub delta: Degrees,
    /// Whole steps to take.
    pub steps: u32,
    /// Travel direction, `None` when there is nothing to do.
    pub direction: Option<Direction>,
}

impl MotionPlan {
    /// Quantize a relative move to the nearest whole step.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidAngle` if the step count does not fit in a `u32`.
    pub fn from_delta(delta: Degrees, steps_per_degree: f64) -> Result<Self, MotionError> {
        let raw = libm::round(libm::fabs(delta.0) * steps_per_degree);
        if raw.is_nan() || raw > u32::MAX as f64 {
            return Err(MotionError::InvalidAngle(delta.0));
        }
        let steps = raw as u32;
        let direction = if steps == 0 {
            None
        } else {
            Direction::from_delta(delta)
        };
        Ok(Self {
            delta,
            steps,
            direction,
        })
    }

    /// Check whether the plan moves the motor at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.direction.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPD_4096: f64 = 4096.0 / 360.0;

    #[test]
    fn test_quarter_turn_step_count() {
        let plan = MotionCommand::GoTo(Degrees(90.0))
            .resolve(Degrees::ZERO, SPD_4096)
            .unwrap();
        assert_eq!(plan.steps, 1024);
        assert_eq!(plan.direction, Some(Direction::Forward));
    }

    #[test]
    fn test_wraparound_goes_short_way() {
        let plan = MotionCommand::GoTo(Degrees(10.0))
            .resolve(Degrees(350.0), SPD_4096)
            .unwrap();
        assert!((plan.delta.0 - 20.0).abs() < 1e-9);
        assert_eq!(plan.direction, Some(Direction::Forward));
        assert_eq!(plan.steps, 228);
    }

    #[test]
    fn test_negative_target_normalized() {
        let plan = MotionCommand::GoTo(Degrees(-10.0))
            .resolve(Degrees(30.0), SPD_4096)
            .unwrap();
        assert!((plan.delta.0 + 40.0).abs() < 1e-9);
        assert_eq!(plan.direction, Some(Direction::Reverse));
    }

    #[test]
    fn test_rotate_keeps_sign_and_size() {
        let plan = MotionCommand::Rotate(Degrees(-450.0))
            .resolve(Degrees(123.0), 1024.0 / 360.0)
            .unwrap();
        assert_eq!(plan.steps, 1280);
        assert_eq!(plan.direction, Some(Direction::Reverse));
    }

    #[test]
    fn test_sub_step_delta_is_empty() {
        let plan = MotionPlan::from_delta(Degrees(0.01), SPD_4096).unwrap();
        assert_eq!(plan.steps, 0);
        assert!(plan.is_empty());
        assert!(MotionPlan::from_delta(Degrees::ZERO, SPD_4096).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_rotation_rejected() {
        assert_eq!(
            MotionCommand::Rotate(Degrees(1.0e12)).resolve(Degrees::ZERO, SPD_4096),
            Err(MotionError::InvalidAngle(1.0e12))
        );
        assert_eq!(
            MotionCommand::Rotate(Degrees(-1.0e12)).resolve(Degrees::ZERO, SPD_4096),
            Err(MotionError::InvalidAngle(-1.0e12))
        );

        // Largest rotation that still fits is accepted unclamped.
        let turns = (u32::MAX / 4096) as f64;
        let plan = MotionCommand::Rotate(Degrees(turns * 360.0))
            .resolve(Degrees::ZERO, SPD_4096)
            .unwrap();
        assert_eq!(plan.steps, (u32::MAX / 4096) * 4096);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            MotionCommand::GoTo(Degrees(f64::INFINITY)).resolve(Degrees::ZERO, SPD_4096),
            Err(MotionError::InvalidAngle(f64::INFINITY))
        );
        assert!(matches!(
            MotionCommand::Rotate(Degrees(f64::NAN)).validate(),
            Err(MotionError::InvalidAngle(_))
        ));
    }
}
