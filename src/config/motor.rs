//! Motor configuration from TOML.

use serde::Deserialize;

use super::sequence::{CoilOrder, StepSequence};

/// Per-motor configuration from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotorConfig {
    /// Bus slot; the motor occupies bits `[slot * bits_per_motor, (slot + 1) * bits_per_motor)`.
    ///
    /// Defaults to the motor's declaration index.
    #[serde(default)]
    pub slot: Option<u8>,

    /// Sequence steps per output shaft revolution (4096 for a half-stepped 28BYJ-48).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u32,

    /// Pause between consecutive steps in microseconds.
    #[serde(default = "default_step_delay_us")]
    pub step_delay_us: u32,

    /// Coil pattern table; defaults to the CCW half-step table.
    #[serde(default)]
    pub sequence: Option<StepSequence>,

    /// Optional wiring remap applied to every pattern.
    #[serde(default)]
    pub coil_order: Option<CoilOrder>,
}

fn default_steps_per_revolution() -> u32 {
    4096
}

fn default_step_delay_us() -> u32 {
    1200
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            slot: None,
            steps_per_revolution: default_steps_per_revolution(),
            step_delay_us: default_step_delay_us(),
            sequence: None,
            coil_order: None,
        }
    }
}

impl MotorConfig {
    /// Pin the motor to a bus slot.
    pub fn with_slot(mut self, slot: u8) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Set steps per revolution.
    pub fn with_steps_per_revolution(mut self, steps: u32) -> Self {
        self.steps_per_revolution = steps;
        self
    }

    /// Set the inter-step delay.
    pub fn with_step_delay_us(mut self, delay_us: u32) -> Self {
        self.step_delay_us = delay_us;
        self
    }

    /// Replace the coil pattern table.
    pub fn with_sequence(mut self, sequence: StepSequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Set the wiring remap.
    pub fn with_coil_order(mut self, order: CoilOrder) -> Self {
        self.coil_order = Some(order);
        self
    }

    /// Steps per degree of output rotation.
    pub fn steps_per_degree(&self) -> f64 {
        self.steps_per_revolution as f64 / 360.0
    }
}
