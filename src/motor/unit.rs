//! One stepper on the shared bus: phase stepping and angle bookkeeping.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use heapless::String;
use parking_lot::Mutex;

use crate::bus::{RegisterBus, RegisterWriter};
use crate::config::units::Degrees;
use crate::config::{InitialState, MotorLayout};
use crate::error::{HardwareWriteError, MotionError, Result};
use crate::motion::{Direction, MotionCommand, MotionExecutor, MotionPlan};

use super::position::Position;

/// How a motion command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// No command has run since the last outcome was collected.
    Idle,
    /// Every planned step was issued.
    Completed {
        /// Steps issued.
        steps: u32,
    },
    /// A stop request ended the command at a step boundary.
    Stopped {
        /// Steps issued before stopping.
        steps_taken: u32,
        /// Steps the plan called for.
        steps_requested: u32,
    },
}

impl MotionOutcome {
    /// Steps physically issued by the command.
    pub fn steps_taken(&self) -> u32 {
        match *self {
            MotionOutcome::Idle => 0,
            MotionOutcome::Completed { steps } => steps,
            MotionOutcome::Stopped { steps_taken, .. } => steps_taken,
        }
    }
}

/// State owned by the single in-flight command of a motor.
#[derive(Debug)]
pub struct StepDrive<D> {
    /// Index into the motor's step sequence.
    phase: u8,
    delay: D,
}

impl<D: DelayNs> StepDrive<D> {
    /// Create a drive at `phase`.
    pub fn new(phase: u8, delay: D) -> Self {
        Self { phase, delay }
    }

    /// Current sequence index.
    #[inline]
    pub fn phase(&self) -> u8 {
        self.phase
    }
}

/// One stepper motor attached to a [`RegisterBus`].
///
/// The bus is shared by every motor; the angle sits behind this motor's own lock so status
/// readers never contend with other motors.
pub struct MotorUnit<W> {
    name: String<32>,
    layout: MotorLayout,
    bus: Arc<RegisterBus<W>>,
    position: Mutex<Position>,
}

impl<W: RegisterWriter> MotorUnit<W> {
    /// Claim the motor's bits on `bus`.
    ///
    /// With [`InitialState::Hold`] the step-0 pattern is written immediately.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the bits overlap another motor or leave the register, or a
    /// `HardwareWriteError` if the hold write fails.
    pub fn attach(
        name: String<32>,
        layout: MotorLayout,
        bus: Arc<RegisterBus<W>>,
        initial_state: InitialState,
    ) -> Result<Self> {
        bus.claim(layout.bit_offset, layout.width)?;
        if initial_state == InitialState::Hold {
            bus.apply_motor_phase(layout.bit_offset, layout.width, layout.sequence.pattern(0))?;
        }
        log::debug!(
            "motor '{}' attached at bits {}..{}",
            name,
            layout.bit_offset,
            layout.bit_offset + layout.width
        );
        let position = Mutex::new(Position::new(layout.steps_per_revolution));
        Ok(Self {
            name,
            layout,
            bus,
            position,
        })
    }

    /// Motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Bus layout of the motor.
    #[inline]
    pub fn layout(&self) -> &MotorLayout {
        &self.layout
    }

    /// Current angle estimate in `[0, 360)`.
    pub fn angle(&self) -> Degrees {
        self.position.lock().degrees()
    }

    /// Declare the current shaft position to be zero. Neither the phase nor the bus changes.
    pub fn set_zero(&self) {
        self.position.lock().set_zero();
    }

    /// Resolve a command against the angle as it is now.
    pub fn plan(&self, command: MotionCommand) -> core::result::Result<MotionPlan, MotionError> {
        command.resolve(self.angle(), self.layout.steps_per_degree)
    }

    /// Advance one phase and push the pattern.
    ///
    /// The phase and angle move only once the write has succeeded.
    pub fn step_once<D>(
        &self,
        drive: &mut StepDrive<D>,
        direction: Direction,
    ) -> core::result::Result<(), HardwareWriteError> {
        let sequence = &self.layout.sequence;
        let next = sequence.advance(drive.phase, direction.sign());
        self.bus
            .apply_motor_phase(self.layout.bit_offset, self.layout.width, sequence.pattern(next))?;
        drive.phase = next;
        self.position.lock().advance(direction);
        Ok(())
    }

    /// Run a plan to completion, to a stop request, or to the first failed write.
    ///
    /// `stop` is checked once per step. Only the bus write is locked; the inter-step delay
    /// runs with no lock held.
    pub fn execute<D: DelayNs>(
        &self,
        plan: &MotionPlan,
        drive: &mut StepDrive<D>,
        stop: &AtomicBool,
    ) -> core::result::Result<MotionOutcome, HardwareWriteError> {
        let mut executor = MotionExecutor::new(plan);
        let Some(direction) = executor.direction() else {
            return Ok(MotionOutcome::Completed { steps: 0 });
        };

        while !executor.is_complete() {
            if executor.current_step() > 0 && self.layout.step_delay_us > 0 {
                drive.delay.delay_us(self.layout.step_delay_us);
            }
            if stop.load(Ordering::Acquire) {
                log::info!(
                    "motor '{}' stopped after {} of {} steps ({} left, {:.0}%)",
                    self.name,
                    executor.current_step(),
                    executor.total_steps(),
                    executor.steps_remaining(),
                    executor.progress() * 100.0
                );
                return Ok(MotionOutcome::Stopped {
                    steps_taken: executor.current_step(),
                    steps_requested: executor.total_steps(),
                });
            }
            if let Err(e) = self.step_once(drive, direction) {
                log::warn!(
                    "motor '{}' aborted after {} steps: {}",
                    self.name,
                    executor.current_step(),
                    e
                );
                return Err(e);
            }
            executor.advance();
        }

        Ok(MotionOutcome::Completed {
            steps: executor.total_steps(),
        })
    }

    /// Rotate by a signed number of degrees, blocking until done.
    pub fn rotate_relative<D: DelayNs>(
        &self,
        delta: Degrees,
        drive: &mut StepDrive<D>,
        stop: &AtomicBool,
    ) -> Result<MotionOutcome> {
        let plan = self.plan(MotionCommand::Rotate(delta))?;
        Ok(self.execute(&plan, drive, stop)?)
    }

    /// Go to an absolute angle by the shortest path, blocking until done.
    pub fn go_to_absolute<D: DelayNs>(
        &self,
        target: Degrees,
        drive: &mut StepDrive<D>,
        stop: &AtomicBool,
    ) -> Result<MotionOutcome> {
        let plan = self.plan(MotionCommand::GoTo(target))?;
        Ok(self.execute(&plan, drive, stop)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusConfig, MotorConfig, HALF_STEP_CCW};
    use crate::error::{ConfigError, Error};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<u32>,
        fail_at: Option<usize>,
    }

    impl RegisterWriter for Recorder {
        fn write(&mut self, word: u32, _width_bits: u8) -> core::result::Result<(), HardwareWriteError> {
            if self.fail_at == Some(self.writes.len()) {
                return Err(HardwareWriteError::Pin);
            }
            self.writes.push(word);
            Ok(())
        }
    }

    fn layout(index: usize, steps_per_revolution: u32) -> MotorLayout {
        let config = MotorConfig::default()
            .with_steps_per_revolution(steps_per_revolution)
            .with_step_delay_us(0);
        MotorLayout::from_config(&config, &BusConfig::default(), index).unwrap()
    }

    fn attach(bus: &Arc<RegisterBus<Recorder>>, index: usize) -> MotorUnit<Recorder> {
        MotorUnit::attach(
            String::try_from("m").unwrap(),
            layout(index, 4096),
            Arc::clone(bus),
            InitialState::Off,
        )
        .unwrap()
    }

    #[test]
    fn test_step_once_walks_sequence() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let unit = attach(&bus, 1);
        let mut drive = StepDrive::new(0, NoopDelay::new());

        unit.step_once(&mut drive, Direction::Forward).unwrap();
        assert_eq!(drive.phase(), 1);
        assert_eq!(bus.word(), (HALF_STEP_CCW[1] as u32) << 4);

        unit.step_once(&mut drive, Direction::Reverse).unwrap();
        unit.step_once(&mut drive, Direction::Reverse).unwrap();
        assert_eq!(drive.phase(), 7);
        assert_eq!(bus.word(), (HALF_STEP_CCW[7] as u32) << 4);
        assert!((unit.angle().0 - (360.0 - 360.0 / 4096.0)).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_turn() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let unit = attach(&bus, 0);
        let mut drive = StepDrive::new(0, NoopDelay::new());
        let stop = AtomicBool::new(false);

        let outcome = unit.go_to_absolute(Degrees(90.0), &mut drive, &stop).unwrap();
        assert_eq!(outcome, MotionOutcome::Completed { steps: 1024 });
        assert!((unit.angle().0 - 90.0).abs() < 1e-9);
        assert_eq!(drive.phase(), 0);
    }

    #[test]
    fn test_stop_flag_ends_before_first_step() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let unit = attach(&bus, 0);
        let mut drive = StepDrive::new(0, NoopDelay::new());
        let stop = AtomicBool::new(true);

        let outcome = unit.rotate_relative(Degrees(45.0), &mut drive, &stop).unwrap();
        assert_eq!(
            outcome,
            MotionOutcome::Stopped {
                steps_taken: 0,
                steps_requested: 512
            }
        );
        assert_eq!(unit.angle(), Degrees::ZERO);
    }

    #[test]
    fn test_failed_write_keeps_state_consistent() {
        let recorder = Recorder {
            fail_at: Some(10),
            ..Recorder::default()
        };
        let bus = Arc::new(RegisterBus::new(recorder, 8));
        let unit = attach(&bus, 0);
        let mut drive = StepDrive::new(0, NoopDelay::new());
        let stop = AtomicBool::new(false);

        let result = unit.rotate_relative(Degrees(90.0), &mut drive, &stop);
        assert_eq!(result, Err(Error::Hardware(HardwareWriteError::Pin)));
        assert_eq!(drive.phase(), 10 % 8);
        assert!((unit.angle().0 - 10.0 * 360.0 / 4096.0).abs() < 1e-9);
        assert_eq!(bus.word(), HALF_STEP_CCW[2] as u32);
    }

    #[test]
    fn test_set_zero_leaves_bus_alone() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let unit = attach(&bus, 0);
        let mut drive = StepDrive::new(0, NoopDelay::new());
        unit.step_once(&mut drive, Direction::Forward).unwrap();

        let word = bus.word();
        unit.set_zero();
        assert_eq!(unit.angle(), Degrees::ZERO);
        assert_eq!(bus.word(), word);
        assert_eq!(drive.phase(), 1);
    }

    #[test]
    fn test_hold_writes_step_zero() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let _unit = MotorUnit::attach(
            String::try_from("m").unwrap(),
            layout(1, 4096),
            Arc::clone(&bus),
            InitialState::Hold,
        )
        .unwrap();
        assert_eq!(bus.word(), (HALF_STEP_CCW[0] as u32) << 4);
    }

    #[test]
    fn test_attach_rejects_overlap() {
        let bus = Arc::new(RegisterBus::new(Recorder::default(), 8));
        let _first = attach(&bus, 0);
        let second = MotorUnit::attach(
            String::try_from("n").unwrap(),
            layout(0, 4096),
            Arc::clone(&bus),
            InitialState::Off,
        );
        assert!(matches!(
            second,
            Err(Error::Config(ConfigError::OverlappingBits { offset: 0, width: 4 }))
        ));
    }
}
