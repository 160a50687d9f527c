//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::layout::MotorLayout;
use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Bus widths are in range
/// - Each motor has a valid step count, sequence, and coil order
/// - Each motor's bit range lies inside the register
/// - No two motors claim overlapping bits
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    let bus = &config.bus;
    if bus.bits_per_motor == 0 || bus.bits_per_motor > super::MAX_BITS_PER_MOTOR {
        return Err(Error::Config(ConfigError::InvalidBitWidth(bus.bits_per_motor)));
    }
    if bus.register_bits == 0 || bus.register_bits > 32 {
        return Err(Error::Config(ConfigError::InvalidRegisterWidth(
            bus.register_bits,
        )));
    }

    let mut claimed: u32 = 0;
    for (index, motor) in config.motors.values().enumerate() {
        let layout = MotorLayout::from_config(motor, bus, index)?;
        let mask = layout.mask();
        if claimed & mask != 0 {
            return Err(Error::Config(ConfigError::OverlappingBits {
                offset: layout.bit_offset,
                width: layout.width,
            }));
        }
        claimed |= mask;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BusConfig, MotorConfig};

    #[test]
    fn test_overlapping_slots() {
        let config = SystemConfig::builder()
            .motor("m1", MotorConfig::default().with_slot(0))
            .motor("m2", MotorConfig::default().with_slot(0))
            .build_unchecked();

        assert_eq!(
            validate_config(&config),
            Err(Error::Config(ConfigError::OverlappingBits {
                offset: 0,
                width: 4
            }))
        );
    }

    #[test]
    fn test_implicit_slot_collides_with_explicit() {
        // m2 defaults to slot 1, which m1 already pinned
        let config = SystemConfig::builder()
            .motor("m1", MotorConfig::default().with_slot(1))
            .motor("m2", MotorConfig::default())
            .build_unchecked();

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::OverlappingBits { offset: 4, .. }))
        ));
    }

    #[test]
    fn test_invalid_bit_width() {
        let config = SystemConfig::builder()
            .bus(BusConfig {
                bits_per_motor: 0,
                ..BusConfig::default()
            })
            .build_unchecked();

        assert_eq!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidBitWidth(0)))
        );
    }

    #[test]
    fn test_wide_register() {
        let config = SystemConfig::builder()
            .register_bits(16)
            .motor("a", MotorConfig::default())
            .motor("b", MotorConfig::default())
            .motor("c", MotorConfig::default())
            .build_unchecked();

        assert!(validate_config(&config).is_ok());
    }
}
