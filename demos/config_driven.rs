//! Example: Configuration-driven controller.
//!
//! This example demonstrates how to:
//! - Load bus and motor configuration from TOML
//! - Use explicit slots and coil order remapping
//! - Stop a long move and inspect the outcome
//!
//! Run with: `cargo run --example config_driven --features std`

use std::thread;
use std::time::Duration;

use shiftreg_stepper::{
    error::{HardwareWriteError, Result},
    parse_config, Controller, MotionOutcome, RegisterWriter, StdDelay,
};

/// Writer that prints each word instead of touching hardware.
struct ConsoleWriter {
    writes: u64,
}

impl RegisterWriter for ConsoleWriter {
    fn write(&mut self, word: u32, width_bits: u8) -> core::result::Result<(), HardwareWriteError> {
        self.writes += 1;
        if self.writes % 256 == 1 {
            println!("  write #{:<5} {:0w$b}", self.writes, word, w = width_bits as usize);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Configuration-Driven Example ===\n");

    let toml_content = r#"
[bus]
bits_per_motor = 4
register_bits = 8
initial_state = "hold"

# Wired to the upper nibble with IN1..IN4 on bits 1, 3, 2, 0.
[motors.pan]
slot = 1
steps_per_revolution = 4096
step_delay_us = 1200
coil_order = [1, 3, 2, 0]

[motors.tilt]
slot = 0
steps_per_revolution = 1024
step_delay_us = 2000
"#;

    let config = parse_config(toml_content)?;
    for name in config.motor_names() {
        let layout = config.layout(name)?;
        println!(
            "{:<5} bits {}..{}  {:.4} steps/deg  sequence {:?}",
            name,
            layout.bit_offset,
            layout.bit_offset + layout.width,
            layout.steps_per_degree,
            layout.sequence.patterns()
        );
    }
    println!();

    let controller = Controller::from_config(&config, ConsoleWriter { writes: 0 }, StdDelay)?;

    controller.go_angle("pan", 45.0)?;
    controller.rotate("tilt", 720.0)?;

    thread::sleep(Duration::from_millis(300));
    controller.stop("tilt")?;

    match controller.wait("tilt")? {
        MotionOutcome::Stopped {
            steps_taken,
            steps_requested,
        } => println!("tilt stopped after {steps_taken}/{steps_requested} steps"),
        other => println!("tilt finished: {other:?}"),
    }
    println!("pan: {:?}", controller.wait("pan")?);

    for name in controller.motor_names() {
        println!("  {:<5} {:>8.3}°", name, controller.current_angle(name)?.value());
    }

    controller.release()?;
    Ok(())
}
