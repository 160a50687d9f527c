//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::ConfigError;

use super::bus::BusConfig;
use super::layout::MotorLayout;
use super::motor::MotorConfig;

/// Maximum number of motors on one bus.
pub const MAX_MOTORS: usize = 8;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Register bus layout.
    #[serde(default)]
    pub bus: BusConfig,

    /// Named motor configurations, in declaration order.
    #[serde(default)]
    pub motors: FnvIndexMap<String<32>, MotorConfig, MAX_MOTORS>,
}

impl SystemConfig {
    /// Start building a configuration in code.
    pub fn builder() -> super::SystemConfigBuilder {
        super::SystemConfigBuilder::new()
    }

    /// Get a motor configuration by name.
    pub fn motor(&self, name: &str) -> Option<&MotorConfig> {
        self.motors
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// Declaration index of a motor.
    pub fn motor_index(&self, name: &str) -> Option<usize> {
        self.motors.keys().position(|k| k.as_str() == name)
    }

    /// List all motor names.
    pub fn motor_names(&self) -> impl Iterator<Item = &str> {
        self.motors.keys().map(|s| s.as_str())
    }

    /// Derive the bus layout of a named motor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MotorNotFound` for an unknown name, or the layout error.
    pub fn layout(&self, name: &str) -> Result<MotorLayout, ConfigError> {
        let index = self.motor_index(name).ok_or_else(|| {
            ConfigError::MotorNotFound(String::try_from(name).unwrap_or_default())
        })?;
        let config = self.motors.values().nth(index).ok_or_else(|| {
            ConfigError::MotorNotFound(String::try_from(name).unwrap_or_default())
        })?;
        MotorLayout::from_config(config, &self.bus, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_preserved() {
        let config = SystemConfig::builder()
            .motor("b", MotorConfig::default())
            .motor("a", MotorConfig::default())
            .build()
            .unwrap();

        let names: heapless::Vec<&str, 8> = config.motor_names().collect();
        assert_eq!(names.as_slice(), &["b", "a"]);
        assert_eq!(config.motor_index("a"), Some(1));
        assert_eq!(config.layout("a").unwrap().bit_offset, 4);
    }

    #[test]
    fn test_unknown_motor_layout() {
        let config = SystemConfig::default();
        assert!(matches!(
            config.layout("missing"),
            Err(ConfigError::MotorNotFound(_))
        ));
    }
}
