//! Per-motor bus layout derived from configuration.

use crate::error::ConfigError;

use super::bus::BusConfig;
use super::motor::MotorConfig;
use super::sequence::{StepSequence, MAX_BITS_PER_MOTOR};

/// Derived parameters for one motor on the bus.
///
/// Computed once at setup and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorLayout {
    /// First register bit owned by the motor.
    pub bit_offset: u8,

    /// Number of register bits owned by the motor.
    pub width: u8,

    /// Coil patterns with any coil order already applied.
    pub sequence: StepSequence,

    /// Steps per output revolution.
    pub steps_per_revolution: u32,

    /// Steps per degree of output rotation.
    pub steps_per_degree: f64,

    /// Inter-step delay in microseconds.
    pub step_delay_us: u32,
}

impl MotorLayout {
    /// Derive the layout of the motor declared at `index`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for invalid widths, sequences, coil orders, or a slot past the
    /// end of the register. Overlap with other motors is checked when the bits are claimed.
    pub fn from_config(
        config: &MotorConfig,
        bus: &BusConfig,
        index: usize,
    ) -> Result<Self, ConfigError> {
        let width = bus.bits_per_motor;
        if width == 0 || width > MAX_BITS_PER_MOTOR {
            return Err(ConfigError::InvalidBitWidth(width));
        }
        if bus.register_bits == 0 || bus.register_bits > 32 {
            return Err(ConfigError::InvalidRegisterWidth(bus.register_bits));
        }
        if config.steps_per_revolution == 0 {
            return Err(ConfigError::InvalidStepsPerRevolution(
                config.steps_per_revolution,
            ));
        }

        let slot = config.slot.map(u16::from).unwrap_or(index as u16);
        let offset = slot * width as u16;
        if offset + width as u16 > bus.register_bits as u16 {
            return Err(ConfigError::SlotOutOfRange {
                offset: offset.min(u8::MAX as u16) as u8,
                width,
                register_bits: bus.register_bits,
            });
        }

        let base = config.sequence.clone().unwrap_or_default();
        base.check(width)?;
        let sequence = match config.coil_order {
            Some(ref order) => {
                order.check(width)?;
                base.remap(order)
            }
            None => base,
        };

        Ok(Self {
            bit_offset: offset as u8,
            width,
            sequence,
            steps_per_revolution: config.steps_per_revolution,
            steps_per_degree: config.steps_per_degree(),
            step_delay_us: config.step_delay_us,
        })
    }

    /// Register bits owned by the motor.
    #[inline]
    pub fn mask(&self) -> u32 {
        field_mask(self.bit_offset, self.width)
    }
}

/// Mask covering `width` bits starting at `offset`.
#[inline]
pub fn field_mask(offset: u8, width: u8) -> u32 {
    let bits = if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    };
    bits.checked_shl(offset as u32).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoilOrder;

    #[test]
    fn test_sequential_offsets() {
        let bus = BusConfig::default();
        let config = MotorConfig::default();

        let first = MotorLayout::from_config(&config, &bus, 0).unwrap();
        let second = MotorLayout::from_config(&config, &bus, 1).unwrap();
        assert_eq!(first.bit_offset, 0);
        assert_eq!(second.bit_offset, 4);
        assert_eq!(first.mask(), 0x0F);
        assert_eq!(second.mask(), 0xF0);
    }

    #[test]
    fn test_explicit_slot_overrides_index() {
        let bus = BusConfig::default();
        let config = MotorConfig::default().with_slot(1);
        let layout = MotorLayout::from_config(&config, &bus, 0).unwrap();
        assert_eq!(layout.bit_offset, 4);
        assert_eq!(layout.mask(), 0xF0);
    }

    #[test]
    fn test_slot_out_of_range() {
        let bus = BusConfig::default();
        let result = MotorLayout::from_config(&MotorConfig::default(), &bus, 2);
        assert_eq!(
            result,
            Err(ConfigError::SlotOutOfRange {
                offset: 8,
                width: 4,
                register_bits: 8
            })
        );
    }

    #[test]
    fn test_coil_order_applied() {
        let bus = BusConfig::default();
        let config =
            MotorConfig::default().with_coil_order(CoilOrder::new(&[1, 0, 3, 2]).unwrap());
        let layout = MotorLayout::from_config(&config, &bus, 0).unwrap();
        assert_eq!(layout.sequence.pattern(0), 0b0010);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let bus = BusConfig::default();
        let config = MotorConfig::default().with_steps_per_revolution(0);
        assert_eq!(
            MotorLayout::from_config(&config, &bus, 0),
            Err(ConfigError::InvalidStepsPerRevolution(0))
        );
    }

    #[test]
    fn test_field_mask_edges() {
        assert_eq!(field_mask(0, 32), u32::MAX);
        assert_eq!(field_mask(28, 4), 0xF000_0000);
        assert_eq!(field_mask(2, 3), 0b11100);
    }
}
