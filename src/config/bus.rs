//! Shift register bus configuration.

use serde::Deserialize;

/// What the register holds before any motor has stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// All outputs low (coils de-energized).
    #[default]
    Off,
    /// Each motor's step-0 pattern is written when it attaches.
    Hold,
}

/// Register bus layout from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BusConfig {
    /// Bits reserved per motor.
    #[serde(default = "default_bits_per_motor")]
    pub bits_per_motor: u8,

    /// Total register width in bits (8 per cascaded chip).
    #[serde(default = "default_register_bits")]
    pub register_bits: u8,

    /// Register contents at startup.
    #[serde(default)]
    pub initial_state: InitialState,
}

fn default_bits_per_motor() -> u8 {
    4
}

fn default_register_bits() -> u8 {
    8
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bits_per_motor: default_bits_per_motor(),
            register_bits: default_register_bits(),
            initial_state: InitialState::Off,
        }
    }
}
