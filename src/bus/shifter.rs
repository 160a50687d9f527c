//! Serial-in/parallel-out shift register driver (74HC595 and compatibles).
//!
//! Bits are clocked out least-significant first: the first bit shifted ends up on the
//! output farthest down the chain, so with cascaded chips the LSB lands on the last chip's
//! final output.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::error::HardwareWriteError;

use super::writer::RegisterWriter;

/// Clock/latch pulse width in nanoseconds.
const PULSE_NS: u32 = 100;

/// Bit-banged shift register on three GPIO pins.
pub struct Shifter<SER, CLK, LATCH, D> {
    /// Serial data (SER / DS)
    data: SER,
    /// Shift clock (SRCLK / SH_CP)
    clock: CLK,
    /// Storage register clock (RCLK / ST_CP)
    latch: LATCH,
    /// Delay for pulse width
    delay: D,
}

impl<SER, CLK, LATCH, D> Shifter<SER, CLK, LATCH, D>
where
    SER: OutputPin,
    CLK: OutputPin,
    LATCH: OutputPin,
    D: DelayNs,
{
    /// Create a driver; the clock and latch pins should already be low.
    pub fn new(data: SER, clock: CLK, latch: LATCH, delay: D) -> Self {
        Self {
            data,
            clock,
            latch,
            delay,
        }
    }

    /// Release the pins and delay.
    pub fn free(self) -> (SER, CLK, LATCH, D) {
        (self.data, self.clock, self.latch, self.delay)
    }

    /// Shift the low `width_bits` of `word` in and latch them.
    pub fn shift_word(&mut self, word: u32, width_bits: u8) -> Result<(), HardwareWriteError> {
        for bit in 0..width_bits.min(32) {
            let level = PinState::from(word & (1 << bit) != 0);
            self.data.set_state(level).map_err(|_| HardwareWriteError::Pin)?;
            self.pulse_clock()?;
        }
        self.pulse_latch()
    }

    fn pulse_clock(&mut self) -> Result<(), HardwareWriteError> {
        self.clock.set_high().map_err(|_| HardwareWriteError::Pin)?;
        self.delay.delay_ns(PULSE_NS);
        self.clock.set_low().map_err(|_| HardwareWriteError::Pin)
    }

    fn pulse_latch(&mut self) -> Result<(), HardwareWriteError> {
        self.latch.set_high().map_err(|_| HardwareWriteError::Pin)?;
        self.delay.delay_ns(PULSE_NS);
        self.latch.set_low().map_err(|_| HardwareWriteError::Pin)
    }
}

impl<SER, CLK, LATCH, D> RegisterWriter for Shifter<SER, CLK, LATCH, D>
where
    SER: OutputPin,
    CLK: OutputPin,
    LATCH: OutputPin,
    D: DelayNs,
{
    fn write(&mut self, word: u32, width_bits: u8) -> Result<(), HardwareWriteError> {
        self.shift_word(word, width_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
    use embedded_hal_mock::eh1::MockError;

    fn pulses(n: usize) -> Vec<Transaction> {
        (0..n)
            .flat_map(|_| [Transaction::set(State::High), Transaction::set(State::Low)])
            .collect()
    }

    #[test]
    fn test_shifts_lsb_first_then_latches() {
        let data = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let clock = PinMock::new(&pulses(4));
        let latch = PinMock::new(&pulses(1));

        let mut shifter = Shifter::new(data, clock, latch, NoopDelay::new());
        shifter.write(0b0101, 4).unwrap();

        let (mut data, mut clock, mut latch, _) = shifter.free();
        data.done();
        clock.done();
        latch.done();
    }

    #[test]
    fn test_zero_word_clears_outputs() {
        let lows: Vec<Transaction> = (0..8).map(|_| Transaction::set(State::Low)).collect();
        let data = PinMock::new(&lows);
        let clock = PinMock::new(&pulses(8));
        let latch = PinMock::new(&pulses(1));

        let mut shifter = Shifter::new(data, clock, latch, NoopDelay::new());
        shifter.shift_word(0, 8).unwrap();

        let (mut data, mut clock, mut latch, _) = shifter.free();
        data.done();
        clock.done();
        latch.done();
    }

    #[test]
    fn test_pin_error_maps_to_hardware_error() {
        let data = PinMock::new(&[
            Transaction::set(State::High).with_error(MockError::Io(std::io::ErrorKind::Other)),
        ]);
        let clock = PinMock::new(&[]);
        let latch = PinMock::new(&[]);

        let mut shifter = Shifter::new(data, clock, latch, NoopDelay::new());
        assert_eq!(shifter.write(1, 8), Err(HardwareWriteError::Pin));

        let (mut data, mut clock, mut latch, _) = shifter.free();
        data.done();
        clock.done();
        latch.done();
    }
}
