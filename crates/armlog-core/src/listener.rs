//! ArmbandListener: adapts device events onto a [`SampleState`]

use crate::event::DeviceListener;
use crate::feedback::{pose_feedback, DeviceCommand};
use crate::orientation::Quaternion;
use crate::pose::{Arm, Pose, XDirection};
use crate::sample_state::SampleState;
use crate::timestamp::DeviceTimestamp;
use crate::types::{DeviceInfo, EmgFrame, Vector3};
use tracing::{debug, info, trace, warn};

/// Listener that keeps the latest telemetry and queues device feedback
#[derive(Debug, Default)]
pub struct ArmbandListener {
    state: SampleState,
    device: Option<DeviceInfo>,
    pending_commands: Vec<DeviceCommand>,
    events_handled: u64,
}

impl ArmbandListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SampleState {
        &self.state
    }

    /// Device that last paired, if it is still around
    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Take the feedback commands queued since the last call
    pub fn drain_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    fn touch(&mut self, timestamp: DeviceTimestamp) {
        self.events_handled += 1;
        self.state.record_timestamp(timestamp);
    }
}

impl DeviceListener for ArmbandListener {
    fn on_paired(&mut self, timestamp: DeviceTimestamp, device: &DeviceInfo) {
        self.touch(timestamp);
        info!(device = %device, "Armband paired");
        self.device = Some(device.clone());
    }

    fn on_connected(&mut self, timestamp: DeviceTimestamp) {
        self.touch(timestamp);
        info!("Armband connected");
    }

    fn on_disconnected(&mut self, timestamp: DeviceTimestamp) {
        warn!("Armband disconnected, clearing telemetry");
        self.state.reset();
        self.touch(timestamp);
    }

    fn on_unpaired(&mut self, timestamp: DeviceTimestamp) {
        warn!("Armband lost, clearing telemetry");
        self.state.reset();
        self.device = None;
        self.pending_commands.clear();
        self.touch(timestamp);
    }

    fn on_emg(&mut self, timestamp: DeviceTimestamp, emg: &EmgFrame) {
        self.touch(timestamp);
        trace!(?emg, "EMG frame");
        self.state.apply_emg_update(*emg);
    }

    fn on_accelerometer(&mut self, timestamp: DeviceTimestamp, accel: Vector3) {
        self.touch(timestamp);
        self.state.apply_acceleration_update(accel);
    }

    fn on_orientation(&mut self, timestamp: DeviceTimestamp, quat: Quaternion) {
        self.touch(timestamp);
        self.state.apply_orientation_update(quat);
    }

    fn on_gyroscope(&mut self, timestamp: DeviceTimestamp, gyro: Vector3) {
        self.touch(timestamp);
        self.state.apply_gyroscope_update(gyro);
    }

    fn on_pose(&mut self, timestamp: DeviceTimestamp, pose: Pose) {
        self.touch(timestamp);
        debug!(%pose, "Pose changed");
        self.state.apply_pose_update(pose);
        self.pending_commands.extend(pose_feedback(pose));
    }

    fn on_arm_sync(&mut self, timestamp: DeviceTimestamp, arm: Arm, x_direction: XDirection) {
        self.touch(timestamp);
        info!(%arm, %x_direction, "Arm synced");
        self.state.apply_arm_sync_update(true);
        self.state.apply_arm_placement(arm, x_direction);
    }

    fn on_arm_unsync(&mut self, timestamp: DeviceTimestamp) {
        self.touch(timestamp);
        info!("Arm unsynced");
        self.state.apply_arm_sync_update(false);
    }

    fn on_unlock(&mut self, timestamp: DeviceTimestamp) {
        self.touch(timestamp);
        debug!("Armband unlocked");
        self.state.apply_lock_update(true);
    }

    fn on_lock(&mut self, timestamp: DeviceTimestamp) {
        self.touch(timestamp);
        debug!("Armband locked");
        self.state.apply_lock_update(false);
    }
}
