//! Plain value types shared by the aggregator, the device layer and the renderers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of electrode channels on the armband
pub const EMG_CHANNELS: usize = 8;

/// Standard gravity in m/s², applied to raw accelerometer readings (g units)
pub const STANDARD_GRAVITY: f32 = 9.81;

/// One EMG sample: a raw reading per electrode, in channel order
pub type EmgFrame = [i8; EMG_CHANNELS];

/// Three-component vector used for acceleration and angular velocity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Multiply every component by `factor`
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Identity of a connected armband
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: Uuid,
    pub name: String,
    pub firmware: String,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, firmware: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            firmware: firmware.into(),
        }
    }
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (firmware {}, id {})", self.name, self.firmware, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_scale() {
        let v = Vector3::new(1.0, -2.0, 0.0).scale(STANDARD_GRAVITY);
        assert_eq!(v, Vector3::new(9.81, -19.62, 0.0));
        assert_eq!(v.to_array(), [9.81, -19.62, 0.0]);
    }

    #[test]
    fn test_device_info_ids_are_unique() {
        let a = DeviceInfo::new("armband", "1.5.1970");
        let b = DeviceInfo::new("armband", "1.5.1970");
        assert_ne!(a.id, b.id);
        assert!(a.to_string().starts_with("armband (firmware 1.5.1970"));
    }
}
