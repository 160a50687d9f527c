//! Angle arithmetic on a 360° circle.

use crate::config::units::Degrees;

/// One full revolution.
pub const FULL_TURN: f64 = 360.0;

/// Direction of travel through the step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward through the sequence; angle increases.
    Forward,
    /// Backward through the sequence; angle decreases.
    Reverse,
}

impl Direction {
    /// Direction of a signed angular delta, or `None` for zero.
    #[inline]
    pub fn from_delta(delta: Degrees) -> Option<Self> {
        match signum(delta.0) {
            1 => Some(Direction::Forward),
            -1 => Some(Direction::Reverse),
            _ => None,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Sign of `x` as -1, 0 or +1. NaN maps to 0.
#[inline]
pub fn signum(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Reduce an angle into `[0, 360)`.
#[inline]
pub fn normalize(angle: Degrees) -> Degrees {
    let mut r = libm::fmod(angle.0, FULL_TURN);
    if r < 0.0 {
        r += FULL_TURN;
    }
    // -1e-18 + 360.0 rounds up to 360.0
    if r >= FULL_TURN {
        r = 0.0;
    }
    Degrees(r)
}

/// Signed shortest rotation from `current` to `target`, in `(-180, 180]`.
///
/// An exactly antipodal target resolves to `+180`.
#[inline]
pub fn shortest_path(current: Degrees, target: Degrees) -> Degrees {
    let delta = normalize(Degrees(target.0 - current.0)).0;
    if delta > FULL_TURN / 2.0 {
        Degrees(delta - FULL_TURN)
    } else {
        Degrees(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_signum() {
        assert_eq!(signum(12.5), 1);
        assert_eq!(signum(-0.001), -1);
        assert_eq!(signum(0.0), 0);
        assert_eq!(signum(-0.0), 0);
        assert_eq!(signum(f64::NAN), 0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Degrees(0.0)).0, 0.0);
        assert_eq!(normalize(Degrees(360.0)).0, 0.0);
        assert_eq!(normalize(Degrees(-10.0)).0, 350.0);
        assert_eq!(normalize(Degrees(725.0)).0, 5.0);
        assert_eq!(normalize(Degrees(-1e-18)).0, 0.0);
    }

    #[test]
    fn test_shortest_path_wraps() {
        assert_eq!(shortest_path(Degrees(350.0), Degrees(10.0)).0, 20.0);
        assert_eq!(shortest_path(Degrees(10.0), Degrees(350.0)).0, -20.0);
        assert_eq!(shortest_path(Degrees(0.0), Degrees(90.0)).0, 90.0);
        assert_eq!(shortest_path(Degrees(0.0), Degrees(-45.0)).0, -45.0);
        assert_eq!(shortest_path(Degrees(30.0), Degrees(30.0)).0, 0.0);
    }

    #[test]
    fn test_antipodal_tie_breaks_positive() {
        assert_eq!(shortest_path(Degrees(0.0), Degrees(180.0)).0, 180.0);
        assert_eq!(shortest_path(Degrees(90.0), Degrees(270.0)).0, 180.0);
        assert_eq!(shortest_path(Degrees(270.0), Degrees(90.0)).0, 180.0);
        assert_eq!(shortest_path(Degrees(180.0), Degrees(0.0)).0, 180.0);
    }

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(Direction::from_delta(Degrees(5.0)), Some(Direction::Forward));
        assert_eq!(Direction::from_delta(Degrees(-5.0)), Some(Direction::Reverse));
        assert_eq!(Direction::from_delta(Degrees(0.0)), None);
        assert_eq!(Direction::Reverse.sign(), -1);
    }

    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = libm::fabs(a - b);
        d.min(FULL_TURN - d)
    }

    proptest! {
        #[test]
        fn prop_shortest_path_lands_on_target(current in 0.0f64..360.0, target in 0.0f64..360.0) {
            let delta = shortest_path(Degrees(current), Degrees(target)).0;
            prop_assert!(delta > -180.0 && delta <= 180.0, "delta {} out of range", delta);
            let landed = normalize(Degrees(current + delta)).0;
            prop_assert!(circular_distance(landed, target) < 1e-9);
        }

        #[test]
        fn prop_normalize_range(angle in -1.0e6f64..1.0e6) {
            let n = normalize(Degrees(angle)).0;
            prop_assert!((0.0..FULL_TURN).contains(&n));
            let turns = (angle - n) / FULL_TURN;
            prop_assert!(libm::fabs(turns - libm::round(turns)) < 1e-9);
        }
    }
}
