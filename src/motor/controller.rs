//! Controller facade for all motors on one bus.

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};

use crate::bus::{RegisterBus, RegisterWriter};
use crate::config::units::Degrees;
use crate::config::{validate_config, MotorLayout, SystemConfig, MAX_MOTORS};
use crate::error::{ConfigError, Error, Result};

use super::scheduler::MotionScheduler;
use super::state::MotorState;
use super::unit::{MotionOutcome, MotorUnit};

/// Owns every motor of a [`SystemConfig`] and the bus they share.
///
/// # Example
///
/// ```rust,ignore
/// use shiftreg_stepper::{Controller, StdDelay};
///
/// let config = shiftreg_stepper::load_config("motors.toml")?;
/// let controller = Controller::from_config(&config, shifter, StdDelay)?;
///
/// controller.zero("pan")?;
/// controller.go_angle("pan", 90.0)?;
/// controller.go_angle("tilt", -45.0)?;
/// controller.wait_all()?;
/// ```
pub struct Controller<W, D> {
    bus: Arc<RegisterBus<W>>,
    motors: Vec<MotionScheduler<W, D>, MAX_MOTORS>,
}

impl<W, D> Controller<W, D>
where
    W: RegisterWriter + Send + 'static,
    D: DelayNs + Clone + Send + 'static,
{
    /// Validate `config`, create the bus over `writer` and attach every motor in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an invalid configuration, or a `HardwareWriteError` if
    /// the initial hold write fails.
    pub fn from_config(config: &SystemConfig, writer: W, delay: D) -> Result<Self> {
        validate_config(config)?;

        let bus = Arc::new(RegisterBus::new(writer, config.bus.register_bits));
        let mut motors = Vec::new();
        for (index, (name, motor)) in config.motors.iter().enumerate() {
            let layout = MotorLayout::from_config(motor, &config.bus, index)?;
            let unit = MotorUnit::attach(
                name.clone(),
                layout,
                Arc::clone(&bus),
                config.bus.initial_state,
            )?;
            motors
                .push(MotionScheduler::new(unit, delay.clone()))
                .map_err(|_| ConfigError::TooManyMotors(index + 1))?;
        }

        log::info!(
            "controller ready: {} motor(s) on a {}-bit register",
            motors.len(),
            bus.width_bits()
        );
        Ok(Self { bus, motors })
    }

    /// Get a motor's scheduler by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MotorNotFound` for an unknown name.
    pub fn motor(&self, name: &str) -> Result<&MotionScheduler<W, D>> {
        self.motors
            .iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| {
                Error::Config(ConfigError::MotorNotFound(
                    String::try_from(name).unwrap_or_default(),
                ))
            })
    }

    /// All motors in declaration order.
    pub fn motors(&self) -> impl Iterator<Item = &MotionScheduler<W, D>> {
        self.motors.iter()
    }

    /// List motor names in declaration order.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.iter().map(|m| m.name())
    }

    /// Declare a motor's current position to be zero.
    pub fn zero(&self, name: &str) -> Result<()> {
        self.motor(name)?.zero();
        Ok(())
    }

    /// Rotate a motor by a signed relative angle.
    pub fn rotate(&self, name: &str, delta: impl Into<Degrees>) -> Result<()> {
        self.motor(name)?.rotate(delta)
    }

    /// Send a motor to an absolute angle by the shortest path.
    pub fn go_angle(&self, name: &str, target: impl Into<Degrees>) -> Result<()> {
        self.motor(name)?.go_angle(target)
    }

    /// Block until a motor is idle and collect its last result.
    pub fn wait(&self, name: &str) -> Result<MotionOutcome> {
        self.motor(name)?.wait()
    }

    /// Wait for every motor. All motors are waited on even if one failed; the first error
    /// is returned.
    pub fn wait_all(&self) -> Result<()> {
        let mut first = Ok(());
        for motor in self.motors.iter() {
            if let Err(e) = motor.wait() {
                if first.is_ok() {
                    first = Err(e);
                }
            }
        }
        first
    }

    /// Current angle estimate of a motor.
    pub fn current_angle(&self, name: &str) -> Result<Degrees> {
        Ok(self.motor(name)?.current_angle())
    }

    /// Scheduler state of a motor.
    pub fn state(&self, name: &str) -> Result<MotorState> {
        Ok(self.motor(name)?.state())
    }

    /// Ask one motor to stop at its next step boundary.
    pub fn stop(&self, name: &str) -> Result<()> {
        self.motor(name)?.stop();
        Ok(())
    }

    /// Ask every motor to stop.
    pub fn stop_all(&self) {
        for motor in self.motors.iter() {
            motor.stop();
        }
    }

    /// Stop and wait for every motor, then de-energize all coils.
    ///
    /// Commands submitted while the release is in progress, including ones already blocked
    /// behind a running command, fail with `MotionError::Halted` instead of re-energizing
    /// the bus. The bus is cleared even if a motor reported an error; that error is returned
    /// afterwards. Angles are kept.
    pub fn release(&self) -> Result<()> {
        for motor in self.motors.iter() {
            motor.halt();
        }
        let waited = self.wait_all();
        let cleared = self.bus.clear();
        for motor in self.motors.iter() {
            motor.resume();
        }
        cleared?;
        waited
    }

    /// Snapshot of the word last pushed to hardware.
    pub fn register_word(&self) -> u32 {
        self.bus.word()
    }

    /// The shared bus.
    pub fn bus(&self) -> &RegisterBus<W> {
        &self.bus
    }
}
