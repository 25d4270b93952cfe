//! Error handling for the armband logger
//!
//! The aggregator itself never fails; these errors cover the edges around it:
//! finding the device, reading configuration, and parsing logged records.

use core::fmt;

/// Result type alias for logger operations
pub type ArmlogResult<T> = Result<T, ArmlogError>;

/// Error type for all logger operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ArmlogError {
    /// No armband appeared within the discovery window
    DeviceNotFound {
        /// How long discovery waited, in milliseconds
        timeout_ms: u64,
    },

    /// The device connection failed or went away unexpectedly
    DeviceError {
        /// Device-related error description
        reason: String,
    },

    /// Invalid logger or simulation configuration
    InvalidConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// Timestamp arithmetic error
    InvalidTimestamp {
        /// Description of timestamp issue
        reason: &'static str,
    },

    /// A logged record or label could not be parsed
    FormatError {
        /// Description of format issue
        reason: String,
    },
}

impl fmt::Display for ArmlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmlogError::DeviceNotFound { timeout_ms } => {
                write!(f, "Unable to find an armband within {}ms", timeout_ms)
            }
            ArmlogError::DeviceError { reason } => {
                write!(f, "Device error: {}", reason)
            }
            ArmlogError::InvalidConfig { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
            ArmlogError::InvalidTimestamp { reason } => {
                write!(f, "Invalid timestamp: {}", reason)
            }
            ArmlogError::FormatError { reason } => {
                write!(f, "Format error: {}", reason)
            }
        }
    }
}

impl std::error::Error for ArmlogError {}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::ArmlogError::InvalidConfig {
            reason: format!($($arg)*)
        }
    };
}

/// Convenience macro for creating format errors
#[macro_export]
macro_rules! format_error {
    ($($arg:tt)*) => {
        $crate::error::ArmlogError::FormatError {
            reason: format!($($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ArmlogError::DeviceNotFound { timeout_ms: 10_000 };
        let display = format!("{}", error);
        assert!(display.contains("Unable to find an armband"));
        assert!(display.contains("10000"));
    }

    #[test]
    fn test_error_macros() {
        let error = config_error!("tick interval {}ms out of range", 0);
        assert_eq!(
            error,
            ArmlogError::InvalidConfig {
                reason: "tick interval 0ms out of range".to_string()
            }
        );

        let error = format_error!("expected {} fields", 19);
        assert_eq!(format!("{}", error), "Format error: expected 19 fields");
    }
}
