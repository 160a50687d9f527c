//! # shiftreg-stepper
//!
//! Concurrent control of several unipolar stepper motors driven through one shared
//! serial-in/parallel-out shift register (74HC595 + ULN2003 style wiring).
//!
//! ## Features
//!
//! - **Shared bus, no lost bits**: every phase update is a read-modify-write of the whole
//!   register word and the hardware push, under one bus-wide lock
//! - **Per-motor FIFO**: a new command waits for the motor's previous one; distinct motors
//!   run concurrently
//! - **Shortest-path targets**: absolute moves take the short way round, `(-180, 180]`
//! - **Configuration-driven**: bus layout, slots, step counts and coil order from TOML
//! - **embedded-hal 1.0**: the bundled [`Shifter`] drives the register over `OutputPin`s
//! - **no_std core**: configuration, angle math and planning build without `std`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shiftreg_stepper::{Controller, Shifter, StdDelay};
//!
//! let config = shiftreg_stepper::load_config("motors.toml")?;
//! let shifter = Shifter::new(ser, srclk, rclk, StdDelay);
//! let controller = Controller::from_config(&config, shifter, StdDelay)?;
//!
//! controller.zero("pan")?;
//! controller.go_angle("pan", 90.0)?;
//! controller.go_angle("tilt", 350.0)?;
//! controller.wait_all()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): threaded runtime, TOML loading, `std::error::Error` impls

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod bus;
pub mod config;
pub mod error;
pub mod motion;
#[cfg(feature = "std")]
pub mod motor;

// Re-exports for ergonomic API
pub use bus::{RegisterWriter, Shifter};
pub use config::{validate_config, BusConfig, InitialState, MotorConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{normalize, shortest_path, signum, Direction, MotionCommand, MotionPlan};

#[cfg(feature = "std")]
pub use bus::RegisterBus;
#[cfg(feature = "std")]
pub use motor::{Controller, MotionOutcome, MotionScheduler, MotorState, MotorUnit, StdDelay};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, UnitExt};
