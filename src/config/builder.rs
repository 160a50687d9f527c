//! Builder for constructing configurations in code.

use heapless::String;

use crate::error::{ConfigError, Error, Result};

use super::bus::{BusConfig, InitialState};
use super::motor::MotorConfig;
use super::system::{SystemConfig, MAX_MOTORS};
use super::validation::validate_config;

/// Builder for [`SystemConfig`].
///
/// Errors from adding motors are deferred to [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
    error: Option<ConfigError>,
}

impl SystemConfigBuilder {
    /// Create a builder with the default bus (two 4-bit slots on one 8-bit register).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bus configuration.
    pub fn bus(mut self, bus: BusConfig) -> Self {
        self.config.bus = bus;
        self
    }

    /// Set the register width in bits.
    pub fn register_bits(mut self, bits: u8) -> Self {
        self.config.bus.register_bits = bits;
        self
    }

    /// Set the bits reserved per motor.
    pub fn bits_per_motor(mut self, bits: u8) -> Self {
        self.config.bus.bits_per_motor = bits;
        self
    }

    /// Set the startup register contents.
    pub fn initial_state(mut self, state: InitialState) -> Self {
        self.config.bus.initial_state = state;
        self
    }

    /// Add a named motor.
    pub fn motor(mut self, name: &str, motor: MotorConfig) -> Self {
        if self.error.is_some() {
            return self;
        }

        let key: String<32> = match String::try_from(name) {
            Ok(key) => key,
            Err(_) => {
                self.error = Some(ConfigError::ParseError(
                    String::try_from("motor name longer than 32 bytes").unwrap_or_default(),
                ));
                return self;
            }
        };

        if self.config.motors.contains_key(&key) {
            self.error = Some(ConfigError::DuplicateMotorName(key));
            return self;
        }

        if self.config.motors.insert(key, motor).is_err() {
            self.error = Some(ConfigError::TooManyMotors(MAX_MOTORS + 1));
        }
        self
    }

    /// Finish and validate.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded while adding motors, or any validation error.
    pub fn build(self) -> Result<SystemConfig> {
        if let Some(e) = self.error {
            return Err(Error::Config(e));
        }
        validate_config(&self.config)?;
        Ok(self.config)
    }

    /// Finish without validating.
    pub fn build_unchecked(self) -> SystemConfig {
        self.config
    }
}
