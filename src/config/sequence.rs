//! Coil-energization tables and wiring remaps.

use heapless::Vec;
use serde::Deserialize;

use crate::error::ConfigError;

/// Maximum number of entries in a step sequence.
pub const MAX_SEQUENCE_LEN: usize = 16;

/// Maximum bits a single motor may occupy on the bus.
pub const MAX_BITS_PER_MOTOR: u8 = 8;

const MAX_COILS: usize = MAX_BITS_PER_MOTOR as usize;

/// Counter-clockwise half-step table for a unipolar stepper (coils A..D = bits 0..3).
pub const HALF_STEP_CCW: [u8; 8] = [
    0b0001, 0b0011, 0b0010, 0b0110, 0b0100, 0b1100, 0b1000, 0b1001,
];

/// Ordered coil patterns; stepping forward walks the table upward.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StepSequence(Vec<u8, MAX_SEQUENCE_LEN>);

impl StepSequence {
    /// The default 8-entry half-step table.
    pub fn half_step() -> Self {
        Self::from_patterns(&HALF_STEP_CCW).unwrap_or_else(|_| Self(Vec::new()))
    }

    /// Build a sequence from raw patterns.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptySequence` for an empty slice and
    /// `ConfigError::SequenceTooLong` past [`MAX_SEQUENCE_LEN`] entries.
    pub fn from_patterns(patterns: &[u8]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        Vec::from_slice(patterns)
            .map(Self)
            .map_err(|_| ConfigError::SequenceTooLong(patterns.len()))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pattern at `index`, wrapping around the table.
    #[inline]
    pub fn pattern(&self, index: u8) -> u8 {
        if self.0.is_empty() {
            return 0;
        }
        self.0[index as usize % self.0.len()]
    }

    /// Index reached by moving one entry in `sign` direction (-1, 0, +1) from `index`.
    #[inline]
    pub fn advance(&self, index: u8, sign: i8) -> u8 {
        let len = self.0.len() as i16;
        if len == 0 {
            return 0;
        }
        (index as i16 + sign as i16).rem_euclid(len) as u8
    }

    /// Raw patterns.
    pub fn patterns(&self) -> &[u8] {
        &self.0
    }

    /// Check every pattern fits in `width` bits.
    pub fn check(&self, width: u8) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        let limit = field_limit(width);
        match self.0.iter().find(|&&p| p as u16 > limit) {
            Some(&pattern) => Err(ConfigError::PatternTooWide { pattern, width }),
            None => Ok(()),
        }
    }

    /// Apply a coil order to every pattern.
    pub fn remap(&self, order: &CoilOrder) -> Self {
        Self(self.0.iter().map(|&p| order.map(p)).collect())
    }
}

impl Default for StepSequence {
    fn default() -> Self {
        Self::half_step()
    }
}

/// Wiring remap: entry `i` is the bit within the motor's field that drives coil input `i`.
///
/// `[0, 1, 2, 3]` is the identity; `[1, 0, 3, 2]` swaps IN1/IN2 and IN3/IN4.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CoilOrder(Vec<u8, MAX_COILS>);

impl CoilOrder {
    /// Build from explicit bit positions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCoilOrder` if more than eight entries are given.
    pub fn new(bits: &[u8]) -> Result<Self, ConfigError> {
        Vec::from_slice(bits)
            .map(Self)
            .map_err(|_| ConfigError::InvalidCoilOrder {
                width: MAX_BITS_PER_MOTOR,
            })
    }

    /// Check the order is a permutation of `0..width`.
    pub fn check(&self, width: u8) -> Result<(), ConfigError> {
        if self.0.len() != width as usize {
            return Err(ConfigError::InvalidCoilOrder { width });
        }
        let mut seen: u16 = 0;
        for &bit in self.0.iter() {
            if bit >= width || seen & (1 << bit) != 0 {
                return Err(ConfigError::InvalidCoilOrder { width });
            }
            seen |= 1 << bit;
        }
        Ok(())
    }

    /// Move each logical coil bit of `pattern` to its wired position.
    pub fn map(&self, pattern: u8) -> u8 {
        self.0
            .iter()
            .enumerate()
            .filter(|(coil, _)| pattern & (1 << coil) != 0)
            .fold(0u8, |out, (_, &bit)| out | (1 << bit))
    }
}

fn field_limit(width: u8) -> u16 {
    (1u16 << width.min(MAX_BITS_PER_MOTOR)) - 1
}
