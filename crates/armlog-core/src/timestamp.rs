//! Device timestamps
//!
//! The armband stamps every event with a microsecond counter from its own
//! monotonic clock. The logger stores the latest one as a side channel and
//! never interprets it beyond ordering and differences.

use crate::error::{ArmlogError, ArmlogResult};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Microsecond-resolution timestamp on the device clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DeviceTimestamp {
    micros: u64,
}

impl DeviceTimestamp {
    /// The clock origin, also used after a device-loss reset
    pub const ZERO: DeviceTimestamp = DeviceTimestamp { micros: 0 };

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_micros(millis * 1_000)
    }

    /// Build a timestamp from fractional seconds, saturating at zero
    pub fn from_secs_f64(secs: f64) -> Self {
        Self::from_micros((secs.max(0.0) * 1_000_000.0) as u64)
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / 1_000_000.0
    }

    /// Calculate duration since another timestamp
    pub fn duration_since(&self, earlier: DeviceTimestamp) -> ArmlogResult<Duration> {
        if self.micros >= earlier.micros {
            Ok(Duration::from_micros(self.micros - earlier.micros))
        } else {
            Err(ArmlogError::InvalidTimestamp {
                reason: "timestamp is earlier than reference",
            })
        }
    }
}

impl fmt::Display for DeviceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.micros / 1_000_000, self.micros % 1_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_creation() {
        let ts = DeviceTimestamp::from_millis(1_500);
        assert_eq!(ts, DeviceTimestamp::from_micros(1_500_000));
        assert_eq!(ts.as_secs_f64(), 1.5);
        assert_eq!(DeviceTimestamp::from_secs_f64(0.25), DeviceTimestamp::from_millis(250));
        assert_eq!(DeviceTimestamp::from_secs_f64(-3.0), DeviceTimestamp::ZERO);
    }

    #[test]
    fn test_duration_calculation() {
        let ts1 = DeviceTimestamp::from_millis(100_000);
        let ts2 = DeviceTimestamp::from_millis(105_000);
        assert_eq!(ts2.duration_since(ts1).unwrap(), Duration::from_secs(5));
        assert!(ts1.duration_since(ts2).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceTimestamp::from_micros(2_000_042).to_string(), "2.000042");
    }
}
