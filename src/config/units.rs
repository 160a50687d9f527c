//! Unit types for physical quantities.
//!
//! Keeps user-facing angles distinct from raw step counts and bit fields.

use core::ops::{Add, Neg, Sub};

use serde::Deserialize;

/// Angular position or distance in degrees.
///
/// Motor angles are reported in `[0, 360)`; relative moves may be any finite value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Zero degrees.
    pub const ZERO: Self = Self(0.0);

    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Check that the value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Reduce into `[0, 360)`.
    #[inline]
    pub fn normalized(self) -> Self {
        crate::motion::normalize(self)
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Degrees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<f64> for Degrees {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f64 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_arithmetic() {
        let a = 30.0.degrees();
        let b = Degrees::new(45.0);
        assert_eq!((a + b).value(), 75.0);
        assert_eq!((a - b).value(), -15.0);
        assert_eq!((-a).value(), -30.0);
    }

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees(-90.0).normalized(), Degrees(270.0));
        assert_eq!(Degrees(720.0).normalized(), Degrees::ZERO);
    }

    #[test]
    fn test_non_finite() {
        assert!(!Degrees(f64::NAN).is_finite());
        assert!(!Degrees(f64::INFINITY).is_finite());
        assert!(Degrees(359.9).is_finite());
    }
}
