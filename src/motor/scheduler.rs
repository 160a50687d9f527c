//! Per-motor command serialization.
//!
//! Each command runs on its own named thread. A new command for the same motor first joins
//! the previous worker, so commands execute in issue order and never interleave, while
//! distinct motors step concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embedded_hal::delay::DelayNs;
use parking_lot::Mutex;

use crate::bus::RegisterWriter;
use crate::config::units::Degrees;
use crate::error::{Error, MotionError, Result};
use crate::motion::MotionCommand;

use super::state::MotorState;
use super::unit::{MotionOutcome, MotorUnit, StepDrive};

/// A finished worker hands back the phase index and the command result.
type Worker = JoinHandle<(u8, Result<MotionOutcome>)>;

struct Slot {
    /// Sequence index while no worker owns it.
    phase: u8,
    worker: Option<Worker>,
    /// Result of the last command, until a caller collects it.
    outcome: Option<Result<MotionOutcome>>,
}

/// Runs motion commands for one motor, one at a time.
pub struct MotionScheduler<W, D> {
    unit: Arc<MotorUnit<W>>,
    delay: D,
    slot: Mutex<Slot>,
    stop: Arc<AtomicBool>,
    moving: Arc<AtomicBool>,
    /// Set between `halt` and `resume`; refuses new commands.
    halted: AtomicBool,
}

impl<W, D> MotionScheduler<W, D>
where
    W: RegisterWriter + Send + 'static,
    D: DelayNs + Clone + Send + 'static,
{
    /// Wrap an attached motor. Each command gets its own clone of `delay`.
    pub fn new(unit: MotorUnit<W>, delay: D) -> Self {
        Self {
            unit: Arc::new(unit),
            delay,
            slot: Mutex::new(Slot {
                phase: 0,
                worker: None,
                outcome: None,
            }),
            stop: Arc::new(AtomicBool::new(false)),
            moving: Arc::new(AtomicBool::new(false)),
            halted: AtomicBool::new(false),
        }
    }

    /// Motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.unit.name()
    }

    /// The motor driven by this scheduler.
    #[inline]
    pub fn unit(&self) -> &MotorUnit<W> {
        &self.unit
    }

    /// Start a command once the previous one for this motor has finished.
    ///
    /// Blocks while a prior command is running. Absolute targets are resolved against the
    /// angle left by that command.
    ///
    /// # Errors
    ///
    /// - `MotionError::InvalidAngle` for a non-finite angle; nothing runs.
    /// - The prior command's error, if it failed and nobody collected it; the new command
    ///   is not started.
    /// - `MotionError::Halted` while the motor is halted, including for a caller that was
    ///   blocked on the prior command when `halt` was called.
    /// - `MotionError::SpawnFailed` if the worker thread could not be created.
    pub fn submit(&self, command: MotionCommand) -> Result<()> {
        command.validate()?;

        let mut slot = self.slot.lock();
        self.reap(&mut slot);
        if self.halted.load(Ordering::Acquire) {
            log::debug!("motor '{}' halted, {:?} dropped", self.unit.name(), command);
            return Err(MotionError::Halted.into());
        }
        if let Some(Err(e)) = slot.outcome.take() {
            return Err(e);
        }

        let plan = self.unit.plan(command)?;
        log::debug!(
            "motor '{}': {:?} -> {} steps {:?}",
            self.unit.name(),
            command,
            plan.steps,
            plan.direction
        );

        self.stop.store(false, Ordering::Release);
        self.moving.store(true, Ordering::Release);

        let unit = Arc::clone(&self.unit);
        let stop = Arc::clone(&self.stop);
        let moving = Arc::clone(&self.moving);
        let mut drive = StepDrive::new(slot.phase, self.delay.clone());

        let mut name = std::string::String::from("stepper-");
        name.push_str(self.unit.name());

        let spawned = thread::Builder::new().name(name).spawn(move || {
            let result = unit.execute(&plan, &mut drive, &stop).map_err(Error::from);
            moving.store(false, Ordering::Release);
            (drive.phase(), result)
        });

        match spawned {
            Ok(handle) => {
                slot.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.moving.store(false, Ordering::Release);
                log::error!("motor '{}': could not spawn worker: {}", self.unit.name(), e);
                Err(MotionError::SpawnFailed.into())
            }
        }
    }

    /// Rotate by a signed relative angle.
    pub fn rotate(&self, delta: impl Into<Degrees>) -> Result<()> {
        self.submit(MotionCommand::Rotate(delta.into()))
    }

    /// Go to an absolute angle by the shortest path.
    pub fn go_angle(&self, target: impl Into<Degrees>) -> Result<()> {
        self.submit(MotionCommand::GoTo(target.into()))
    }

    /// Block until the motor is idle and collect the last command's result.
    ///
    /// Returns `MotionOutcome::Idle` when there is nothing to collect.
    pub fn wait(&self) -> Result<MotionOutcome> {
        let mut slot = self.slot.lock();
        self.reap(&mut slot);
        slot.outcome.take().unwrap_or(Ok(MotionOutcome::Idle))
    }

    /// Ask the running command to stop at the next step boundary. Does not block.
    pub fn stop(&self) {
        if self.moving.load(Ordering::Acquire) {
            log::info!("motor '{}': stop requested", self.unit.name());
        }
        self.stop.store(true, Ordering::Release);
    }

    /// Stop the running command and refuse new ones until [`resume`](Self::resume).
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
        self.stop();
    }

    /// Accept commands again after [`halt`](Self::halt).
    pub fn resume(&self) {
        self.halted.store(false, Ordering::Release);
    }

    /// Declare the current shaft position to be zero.
    pub fn zero(&self) {
        self.unit.set_zero();
        log::debug!("motor '{}' zeroed", self.unit.name());
    }

    /// Current angle estimate in `[0, 360)`. Safe to call while moving.
    pub fn current_angle(&self) -> Degrees {
        self.unit.angle()
    }

    /// Whether a command is in flight.
    pub fn state(&self) -> MotorState {
        if self.moving.load(Ordering::Acquire) {
            MotorState::Moving
        } else {
            MotorState::Idle
        }
    }

    /// Sequence index, or `None` while a command owns it.
    pub fn phase_index(&self) -> Option<u8> {
        if self.moving.load(Ordering::Acquire) {
            return None;
        }
        let mut slot = self.slot.try_lock()?;
        self.reap(&mut slot);
        Some(slot.phase)
    }

    /// Join the worker, if any, and take back the phase index.
    fn reap(&self, slot: &mut Slot) {
        let Some(handle) = slot.worker.take() else {
            return;
        };
        match handle.join() {
            Ok((phase, result)) => {
                slot.phase = phase;
                slot.outcome = Some(result);
            }
            Err(_) => {
                log::error!(
                    "motor '{}': worker panicked, phase reset to 0",
                    self.unit.name()
                );
                self.moving.store(false, Ordering::Release);
                slot.phase = 0;
                slot.outcome = Some(Err(MotionError::WorkerPanicked.into()));
            }
        }
    }
}

impl<W, D> Drop for MotionScheduler<W, D> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.slot.get_mut().worker.take() {
            let _ = handle.join();
        }
    }
}
