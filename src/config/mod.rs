//! Configuration module for shiftreg-stepper.
//!
//! Provides types for loading and validating bus and motor configurations
//! from TOML files (with `std` feature) or building them in code.

mod builder;
mod bus;
mod layout;
#[cfg(feature = "std")]
mod loader;
mod motor;
mod sequence;
mod system;
pub mod units;
mod validation;

pub use builder::SystemConfigBuilder;
pub use bus::{BusConfig, InitialState};
pub use layout::{field_mask, MotorLayout};
pub use motor::MotorConfig;
pub use sequence::{CoilOrder, StepSequence, HALF_STEP_CCW, MAX_BITS_PER_MOTOR, MAX_SEQUENCE_LEN};
pub use system::{SystemConfig, MAX_MOTORS};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::Degrees;
