//! Shift register output path.
//!
//! [`RegisterWriter`] is the hardware boundary, [`Shifter`] drives a 74HC595 chain over
//! embedded-hal pins, and [`RegisterBus`] (std) owns the word shared by all motors.

#[cfg(feature = "std")]
mod register;
mod shifter;
mod writer;

#[cfg(feature = "std")]
pub use register::RegisterBus;
pub use shifter::Shifter;
pub use writer::RegisterWriter;
