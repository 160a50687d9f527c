//! Hardware write primitive.

use crate::error::HardwareWriteError;

/// Pushes a combined output word to the physical shift register.
///
/// Implementations block for the duration of the transfer. Only the low `width_bits`
/// bits of `word` are meaningful.
pub trait RegisterWriter {
    /// Transfer `word` and latch it onto the outputs.
    fn write(&mut self, word: u32, width_bits: u8) -> Result<(), HardwareWriteError>;
}

impl<T: RegisterWriter + ?Sized> RegisterWriter for &mut T {
    #[inline]
    fn write(&mut self, word: u32, width_bits: u8) -> Result<(), HardwareWriteError> {
        (**self).write(word, width_bits)
    }
}

#[cfg(feature = "std")]
impl<T: RegisterWriter + ?Sized> RegisterWriter for std::boxed::Box<T> {
    #[inline]
    fn write(&mut self, word: u32, width_bits: u8) -> Result<(), HardwareWriteError> {
        (**self).write(word, width_bits)
    }
}
