//! Error types for shiftreg-stepper.
//!
//! Provides unified error handling across configuration, bus writes, and motion execution.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all shiftreg-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// The shift register write primitive failed
    Hardware(HardwareWriteError),
    /// Motion request or execution error
    Motion(MotionError),
}

/// Configuration-related errors.
///
/// Raised at setup time, never during motion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Duplicate motor name in configuration
    DuplicateMotorName(heapless::String<32>),
    /// More motors than the bus can hold
    TooManyMotors(usize),
    /// Bits per motor must be 1-8
    InvalidBitWidth(u8),
    /// Register width must be 1-32 bits
    InvalidRegisterWidth(u8),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u32),
    /// Step sequence has no entries
    EmptySequence,
    /// Step sequence has more entries than supported
    SequenceTooLong(usize),
    /// A sequence pattern does not fit in the motor's bit width
    PatternTooWide {
        /// Offending pattern
        pattern: u8,
        /// Bits available per motor
        width: u8,
    },
    /// Coil order is not a permutation of the motor's bit positions
    InvalidCoilOrder {
        /// Bits available per motor
        width: u8,
    },
    /// Motor bit range extends past the end of the register
    SlotOutOfRange {
        /// First bit of the motor's range
        offset: u8,
        /// Bits per motor
        width: u8,
        /// Total register width
        register_bits: u8,
    },
    /// Two motors claim overlapping bit ranges
    OverlappingBits {
        /// First bit of the rejected range
        offset: u8,
        /// Bits per motor
        width: u8,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Failure of the physical register write.
///
/// The in-memory register word is left unchanged when this is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareWriteError {
    /// A GPIO pin operation failed
    Pin,
    /// Device-specific transfer failure
    Device(heapless::String<64>),
}

/// Motion request and execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Target or delta angle is NaN, infinite, or needs more steps than a `u32` holds
    InvalidAngle(f64),
    /// The worker thread for a motion could not be started
    SpawnFailed,
    /// The worker thread for a motion panicked
    WorkerPanicked,
    /// The motor is being released; the command was not started
    Halted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Hardware(e) => write!(f, "Hardware write error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::DuplicateMotorName(name) => write!(f, "Duplicate motor name: '{}'", name),
            ConfigError::TooManyMotors(n) => write!(f, "Too many motors: {}", n),
            ConfigError::InvalidBitWidth(w) => write!(f, "Invalid bits per motor: {}. Must be 1-8", w),
            ConfigError::InvalidRegisterWidth(w) => {
                write!(f, "Invalid register width: {}. Must be 1-32", w)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::EmptySequence => write!(f, "Step sequence is empty"),
            ConfigError::SequenceTooLong(n) => {
                write!(f, "Step sequence has {} entries, maximum is 16", n)
            }
            ConfigError::PatternTooWide { pattern, width } => {
                write!(f, "Pattern {:#b} does not fit in {} bits", pattern, width)
            }
            ConfigError::InvalidCoilOrder { width } => {
                write!(f, "Coil order must be a permutation of 0..{}", width)
            }
            ConfigError::SlotOutOfRange {
                offset,
                width,
                register_bits,
            } => write!(
                f,
                "Bits [{}, {}) exceed the {}-bit register",
                offset,
                *offset as u16 + *width as u16,
                register_bits
            ),
            ConfigError::OverlappingBits { offset, width } => write!(
                f,
                "Bits [{}, {}) are already claimed by another motor",
                offset,
                *offset as u16 + *width as u16
            ),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for HardwareWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareWriteError::Pin => write!(f, "GPIO pin operation failed"),
            HardwareWriteError::Device(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidAngle(v) => write!(f, "Invalid angle: {}", v),
            MotionError::SpawnFailed => write!(f, "Failed to start motion worker"),
            MotionError::WorkerPanicked => write!(f, "Motion worker panicked"),
            MotionError::Halted => write!(f, "Motor is being released"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<HardwareWriteError> for Error {
    fn from(e: HardwareWriteError) -> Self {
        Error::Hardware(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for HardwareWriteError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
