//! Example: Two motors on one shift register, moving concurrently.
//!
//! This example demonstrates how to:
//! - Build a configuration in code
//! - Drive a `Shifter` over embedded-hal pins (mocked here)
//! - Issue per-motor commands that run concurrently and queue per motor
//!
//! Run with: `cargo run --example two_motors --features std`

use std::time::Instant;

use embedded_hal::digital::{ErrorType, OutputPin};
use shiftreg_stepper::{
    error::Result, Controller, InitialState, MotorConfig, Shifter, StdDelay, SystemConfig,
};

/// GPIO pin that only counts rising edges.
#[derive(Default)]
struct CountingPin {
    rising: u32,
    high: bool,
}

impl ErrorType for CountingPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for CountingPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if !self.high {
            self.rising += 1;
        }
        self.high = true;
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Two Motors Example ===\n");

    let config = SystemConfig::builder()
        .initial_state(InitialState::Hold)
        .motor("left", MotorConfig::default().with_step_delay_us(500))
        .motor(
            "right",
            MotorConfig::default()
                .with_steps_per_revolution(1024)
                .with_step_delay_us(2_000),
        )
        .build()?;

    let shifter = Shifter::new(
        CountingPin::default(),
        CountingPin::default(),
        CountingPin::default(),
        StdDelay,
    );
    let controller = Controller::from_config(&config, shifter, StdDelay)?;

    for name in controller.motor_names() {
        controller.zero(name)?;
    }

    let started = Instant::now();
    controller.go_angle("left", 90.0)?;
    controller.go_angle("right", -90.0)?;
    // Queued behind the first move of "left"; "right" keeps running meanwhile.
    controller.go_angle("left", 350.0)?;

    println!(
        "issued in {:?}: left={}, right={}",
        started.elapsed(),
        controller.state("left")?,
        controller.state("right")?
    );

    controller.wait_all()?;
    println!("all idle after {:?}", started.elapsed());

    for name in controller.motor_names() {
        println!("  {:<6} {:>8.3}°", name, controller.current_angle(name)?.value());
    }
    println!("register word: {:#010b}", controller.register_word());

    controller.release()?;
    println!("coils released, word = {:#010b}", controller.register_word());

    Ok(())
}
