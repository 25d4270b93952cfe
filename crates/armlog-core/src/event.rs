//! Device events and the listener seam
//!
//! A device backend translates whatever it receives into [`DeviceEvent`]
//! values; consumers implement [`DeviceListener`] and only override the hooks
//! they care about.

use crate::orientation::Quaternion;
use crate::pose::{Arm, Pose, XDirection};
use crate::timestamp::DeviceTimestamp;
use crate::types::{DeviceInfo, EmgFrame, Vector3};
use serde::{Deserialize, Serialize};

/// A single notification from the armband
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub timestamp: DeviceTimestamp,
    pub kind: EventKind,
}

/// Event payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Paired(DeviceInfo),
    Connected,
    Disconnected,
    /// The device is gone and its state should be forgotten
    Unpaired,
    Emg(EmgFrame),
    /// Raw accelerometer reading in g
    Accelerometer(Vector3),
    Orientation(Quaternion),
    /// Raw angular velocity in deg/s
    Gyroscope(Vector3),
    Pose(Pose),
    ArmSynced { arm: Arm, x_direction: XDirection },
    ArmUnsynced,
    Unlocked,
    Locked,
}

impl EventKind {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Paired(_) => "paired",
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::Unpaired => "unpaired",
            EventKind::Emg(_) => "emg",
            EventKind::Accelerometer(_) => "accelerometer",
            EventKind::Orientation(_) => "orientation",
            EventKind::Gyroscope(_) => "gyroscope",
            EventKind::Pose(_) => "pose",
            EventKind::ArmSynced { .. } => "arm_synced",
            EventKind::ArmUnsynced => "arm_unsynced",
            EventKind::Unlocked => "unlocked",
            EventKind::Locked => "locked",
        }
    }
}

/// Callbacks for device events. Every hook defaults to doing nothing.
#[allow(unused_variables)]
pub trait DeviceListener {
    fn on_paired(&mut self, timestamp: DeviceTimestamp, device: &DeviceInfo) {}
    fn on_connected(&mut self, timestamp: DeviceTimestamp) {}
    fn on_disconnected(&mut self, timestamp: DeviceTimestamp) {}
    fn on_unpaired(&mut self, timestamp: DeviceTimestamp) {}
    fn on_emg(&mut self, timestamp: DeviceTimestamp, emg: &EmgFrame) {}
    fn on_accelerometer(&mut self, timestamp: DeviceTimestamp, accel: Vector3) {}
    fn on_orientation(&mut self, timestamp: DeviceTimestamp, quat: Quaternion) {}
    fn on_gyroscope(&mut self, timestamp: DeviceTimestamp, gyro: Vector3) {}
    fn on_pose(&mut self, timestamp: DeviceTimestamp, pose: Pose) {}
    fn on_arm_sync(&mut self, timestamp: DeviceTimestamp, arm: Arm, x_direction: XDirection) {}
    fn on_arm_unsync(&mut self, timestamp: DeviceTimestamp) {}
    fn on_unlock(&mut self, timestamp: DeviceTimestamp) {}
    fn on_lock(&mut self, timestamp: DeviceTimestamp) {}
}

impl DeviceEvent {
    pub fn new(timestamp: DeviceTimestamp, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    /// Route this event to the matching listener hook
    pub fn dispatch<L: DeviceListener + ?Sized>(&self, listener: &mut L) {
        let ts = self.timestamp;
        match &self.kind {
            EventKind::Paired(device) => listener.on_paired(ts, device),
            EventKind::Connected => listener.on_connected(ts),
            EventKind::Disconnected => listener.on_disconnected(ts),
            EventKind::Unpaired => listener.on_unpaired(ts),
            EventKind::Emg(emg) => listener.on_emg(ts, emg),
            EventKind::Accelerometer(accel) => listener.on_accelerometer(ts, *accel),
            EventKind::Orientation(quat) => listener.on_orientation(ts, *quat),
            EventKind::Gyroscope(gyro) => listener.on_gyroscope(ts, *gyro),
            EventKind::Pose(pose) => listener.on_pose(ts, *pose),
            EventKind::ArmSynced { arm, x_direction } => {
                listener.on_arm_sync(ts, *arm, *x_direction)
            }
            EventKind::ArmUnsynced => listener.on_arm_unsync(ts),
            EventKind::Unlocked => listener.on_unlock(ts),
            EventKind::Locked => listener.on_lock(ts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording {
        calls: Vec<&'static str>,
    }

    impl DeviceListener for Recording {
        fn on_emg(&mut self, _: DeviceTimestamp, _: &EmgFrame) {
            self.calls.push("emg");
        }

        fn on_pose(&mut self, _: DeviceTimestamp, pose: Pose) {
            self.calls.push(pose.as_str());
        }

        fn on_lock(&mut self, _: DeviceTimestamp) {
            self.calls.push("lock");
        }
    }

    #[test]
    fn test_dispatch_routes_to_hooks() {
        let ts = DeviceTimestamp::from_millis(5);
        let events = [
            DeviceEvent::new(ts, EventKind::Emg([0; 8])),
            DeviceEvent::new(ts, EventKind::Gyroscope(Vector3::ZERO)),
            DeviceEvent::new(ts, EventKind::Pose(Pose::Fist)),
            DeviceEvent::new(ts, EventKind::Locked),
        ];

        let mut listener = Recording::default();
        for event in &events {
            event.dispatch(&mut listener);
        }

        // Gyroscope falls through to the default no-op hook
        assert_eq!(listener.calls, vec!["emg", "fist", "lock"]);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::Unpaired.name(), "unpaired");
        let synced = EventKind::ArmSynced {
            arm: Arm::Left,
            x_direction: XDirection::TowardElbow,
        };
        assert_eq!(synced.name(), "arm_synced");
    }
}
