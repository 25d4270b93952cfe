//! SampleState: latest telemetry from the armband
//!
//! Each device event overwrites one field group in place. Nothing here is
//! scheduled or buffered; the owner decides when to read the state out.

use crate::orientation::{EulerAngles, Quaternion};
use crate::pose::{Arm, Pose, XDirection};
use crate::timestamp::DeviceTimestamp;
use crate::types::{EmgFrame, Vector3, EMG_CHANNELS, STANDARD_GRAVITY};
use serde::{Deserialize, Serialize};

/// Aggregated sensor state, updated field group by field group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleState {
    emg: EmgFrame,
    orientation: Quaternion,
    /// Always derived from `orientation`
    angles: EulerAngles,
    angular_velocity: Vector3,
    /// m/s², already scaled from g
    acceleration: Vector3,
    arm_synced: bool,
    arm: Arm,
    x_direction: XDirection,
    unlocked: bool,
    pose: Pose,
    timestamp: DeviceTimestamp,
}

impl SampleState {
    pub fn new() -> Self {
        Self {
            emg: [0; EMG_CHANNELS],
            orientation: Quaternion::IDENTITY,
            angles: EulerAngles::ZERO,
            angular_velocity: Vector3::ZERO,
            acceleration: Vector3::ZERO,
            arm_synced: false,
            arm: Arm::Unknown,
            x_direction: XDirection::Unknown,
            unlocked: false,
            pose: Pose::Unknown,
            timestamp: DeviceTimestamp::ZERO,
        }
    }

    /// Replace the EMG frame wholesale. Raw codes are stored as delivered.
    pub fn apply_emg_update(&mut self, values: EmgFrame) {
        self.emg = values;
    }

    /// Store a raw accelerometer reading (in g) converted to m/s²
    pub fn apply_acceleration_update(&mut self, raw: Vector3) {
        self.acceleration = raw.scale(STANDARD_GRAVITY);
    }

    /// Store the orientation and recompute roll, pitch and yaw from it
    pub fn apply_orientation_update(&mut self, quaternion: Quaternion) {
        self.orientation = quaternion;
        self.angles = EulerAngles::from_quaternion(&quaternion);
    }

    /// Store a raw gyroscope reading unchanged
    pub fn apply_gyroscope_update(&mut self, raw: Vector3) {
        self.angular_velocity = raw;
    }

    pub fn apply_pose_update(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Record arm sync. Unsync also forgets which arm the band was on.
    pub fn apply_arm_sync_update(&mut self, synced: bool) {
        self.arm_synced = synced;
        if !synced {
            self.arm = Arm::Unknown;
            self.x_direction = XDirection::Unknown;
        }
    }

    pub fn apply_arm_placement(&mut self, arm: Arm, x_direction: XDirection) {
        self.arm = arm;
        self.x_direction = x_direction;
    }

    pub fn apply_lock_update(&mut self, unlocked: bool) {
        self.unlocked = unlocked;
    }

    pub fn record_timestamp(&mut self, timestamp: DeviceTimestamp) {
        self.timestamp = timestamp;
    }

    /// Clear everything after the device is lost. The state stays usable
    /// for the next pairing; calling this twice is the same as once.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn emg(&self) -> &EmgFrame {
        &self.emg
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    pub fn angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    pub fn acceleration(&self) -> Vector3 {
        self.acceleration
    }

    pub fn arm_synced(&self) -> bool {
        self.arm_synced
    }

    pub fn arm(&self) -> Arm {
        self.arm
    }

    pub fn x_direction(&self) -> XDirection {
        self.x_direction
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn timestamp(&self) -> DeviceTimestamp {
        self.timestamp
    }
}

impl Default for SampleState {
    fn default() -> Self {
        Self::new()
    }
}
