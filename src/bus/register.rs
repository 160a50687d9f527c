//! The shared register word and its single critical section.

use parking_lot::Mutex;

use crate::config::field_mask;
use crate::error::{ConfigError, HardwareWriteError};

use super::writer::RegisterWriter;

/// Owner of the combined output word for every motor on one shift register chain.
///
/// All motors share one `RegisterBus` (typically behind an `Arc`). Every update is a
/// read-modify-write of the whole word followed by the hardware push, done under one
/// bus-wide lock, so concurrent motors never clobber each other's bits.
pub struct RegisterBus<W> {
    width_bits: u8,
    state: Mutex<BusState<W>>,
}

struct BusState<W> {
    /// Last word successfully pushed to hardware.
    word: u32,
    /// Bits reserved by attached motors.
    claimed: u32,
    writer: W,
}

impl<W: RegisterWriter> RegisterBus<W> {
    /// Create a bus of `width_bits` outputs (clamped to 32). The word starts at zero.
    pub fn new(writer: W, width_bits: u8) -> Self {
        Self {
            width_bits: width_bits.min(32),
            state: Mutex::new(BusState {
                word: 0,
                claimed: 0,
                writer,
            }),
        }
    }

    /// Register width in bits.
    #[inline]
    pub fn width_bits(&self) -> u8 {
        self.width_bits
    }

    /// Reserve `width` bits at `offset` for one motor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SlotOutOfRange` if the range leaves the register and
    /// `ConfigError::OverlappingBits` if any bit is already reserved.
    pub fn claim(&self, offset: u8, width: u8) -> Result<(), ConfigError> {
        if offset as u16 + width as u16 > self.width_bits as u16 || width == 0 {
            return Err(ConfigError::SlotOutOfRange {
                offset,
                width,
                register_bits: self.width_bits,
            });
        }
        let mask = field_mask(offset, width);
        let mut state = self.state.lock();
        if state.claimed & mask != 0 {
            return Err(ConfigError::OverlappingBits { offset, width });
        }
        state.claimed |= mask;
        Ok(())
    }

    /// Replace `width` bits at `bit_offset` with `pattern` and push the new word.
    ///
    /// On a write failure the stored word is left unchanged.
    pub fn apply_motor_phase(
        &self,
        bit_offset: u8,
        width: u8,
        pattern: u8,
    ) -> Result<(), HardwareWriteError> {
        let mask = field_mask(bit_offset, width);
        let bits = ((pattern as u32) << bit_offset) & mask;

        let mut state = self.state.lock();
        let next = (state.word & !mask) | bits;
        state.writer.write(next, self.width_bits)?;
        state.word = next;
        log::trace!("bus word {:#0w$b}", next, w = self.width_bits as usize + 2);
        Ok(())
    }

    /// Drive every output low.
    pub fn clear(&self) -> Result<(), HardwareWriteError> {
        let mut state = self.state.lock();
        state.writer.write(0, self.width_bits)?;
        state.word = 0;
        log::info!("bus cleared");
        Ok(())
    }

    /// Snapshot of the last word pushed to hardware.
    pub fn word(&self) -> u32 {
        self.state.lock().word
    }

    /// Bits currently reserved by motors.
    pub fn claimed(&self) -> u32 {
        self.state.lock().claimed
    }
}
