//! Simulated EMG armband
//!
//! Produces the same event stream a real band would: pairing, 8-channel EMG
//! frames, orientation/accelerometer/gyroscope samples, pose changes gated by
//! the lock state, arm sync and optional connection loss. Time only moves
//! when [`ArmbandSimulator::advance`] is called, so the output is fully
//! deterministic for a given seed and step sequence.

use crate::gesture_patterns::{activation_for, GesturePattern};
use armlog_core::{
    config_error, Arm, ArmlogError, ArmlogResult, DeviceCommand, DeviceEvent, DeviceInfo,
    DeviceTimestamp, EmgFrame, EventKind, Pose, Quaternion, UnlockMode, Vector3, XDirection,
    EMG_CHANNELS,
};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::{debug, info};

/// Firmware string reported by simulated bands
pub const SIMULATED_FIRMWARE: &str = "1.5.1970-sim";

/// Seconds between connecting and the wearer performing the sync gesture
const SYNC_DELAY_SECS: f64 = 1.0;

/// Slow arm movement applied to the orientation stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Peak roll in radians
    pub roll_amplitude: f32,
    /// Peak pitch in radians
    pub pitch_amplitude: f32,
    /// Peak yaw in radians
    pub yaw_amplitude: f32,
    /// Sway frequency in Hz
    pub frequency_hz: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            roll_amplitude: 0.4,
            pitch_amplitude: 0.25,
            yaw_amplitude: 0.8,
            frequency_hz: 0.2,
        }
    }
}

/// Configuration for the simulated armband
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmbandConfig {
    /// Name reported when pairing
    pub device_name: String,
    /// Whether the band can be found at all
    pub available: bool,
    /// Delay before the band pairs, in milliseconds
    pub connect_delay_ms: u64,
    /// EMG frame rate in Hz
    pub emg_rate_hz: f32,
    /// Orientation/accelerometer/gyroscope rate in Hz
    pub imu_rate_hz: f32,
    /// Gaussian noise on EMG readings, in raw units
    pub emg_noise_std: f32,
    /// Gaussian noise on accelerometer readings, in g
    pub imu_noise_std: f32,
    /// Arm movement
    pub motion: MotionConfig,
    /// Gestures performed by the wearer
    pub pattern: GesturePattern,
    /// Arm reported on sync
    pub arm: Arm,
    /// Seconds a timed unlock lasts
    pub timed_unlock_secs: f32,
    /// Drop the connection this many seconds after it was established
    pub disconnect_after_secs: Option<f32>,
    /// Re-pair this many seconds after a drop
    pub reconnect_after_secs: Option<f32>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for ArmbandConfig {
    fn default() -> Self {
        Self {
            device_name: "Simulated Armband".to_string(),
            available: true,
            connect_delay_ms: 250,
            emg_rate_hz: 200.0,
            imu_rate_hz: 50.0,
            emg_noise_std: 2.0,
            imu_noise_std: 0.01,
            motion: MotionConfig::default(),
            pattern: GesturePattern::default(),
            arm: Arm::Right,
            timed_unlock_secs: 2.0,
            disconnect_after_secs: None,
            reconnect_after_secs: None,
            seed: None,
        }
    }
}

impl ArmbandConfig {
    /// Validate simulation parameters
    pub fn validate(&self) -> ArmlogResult<()> {
        const MAX_RATE: f32 = 1000.0;

        if !(self.emg_rate_hz > 0.0 && self.emg_rate_hz <= MAX_RATE) {
            return Err(config_error!("EMG rate {}Hz must be in (0, {}]", self.emg_rate_hz, MAX_RATE));
        }
        if !(self.imu_rate_hz > 0.0 && self.imu_rate_hz <= MAX_RATE) {
            return Err(config_error!("IMU rate {}Hz must be in (0, {}]", self.imu_rate_hz, MAX_RATE));
        }
        if !(self.emg_noise_std >= 0.0 && self.emg_noise_std.is_finite()) {
            return Err(config_error!("EMG noise must be a non-negative number"));
        }
        if !(self.imu_noise_std >= 0.0 && self.imu_noise_std.is_finite()) {
            return Err(config_error!("IMU noise must be a non-negative number"));
        }
        if self.timed_unlock_secs <= 0.0 {
            return Err(config_error!("Timed unlock must last longer than 0s"));
        }
        if let Some(secs) = self.disconnect_after_secs {
            if secs <= 0.0 {
                return Err(config_error!("Disconnect time must be positive"));
            }
        }
        if let Some(secs) = self.reconnect_after_secs {
            if self.disconnect_after_secs.is_none() {
                return Err(config_error!("Reconnect requires a disconnect time"));
            }
            if secs <= 0.0 {
                return Err(config_error!("Reconnect delay must be positive"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Link {
    Searching,
    Connected { since: f64 },
    Lost { since: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LockState {
    Locked,
    /// Unlocked until the given time, or until told otherwise
    Unlocked { until: Option<f64> },
}

/// Armband simulator
pub struct ArmbandSimulator {
    config: ArmbandConfig,
    device: DeviceInfo,
    rng: rand::rngs::StdRng,
    emg_noise: Normal<f32>,
    imu_noise: Normal<f32>,
    clock: f64,
    link: Link,
    dropped_once: bool,
    next_emg: f64,
    next_imu: f64,
    stream_emg: bool,
    synced: bool,
    lock: LockState,
    classified: Pose,
    notifications: u64,
}

impl ArmbandSimulator {
    /// Create new simulator with configuration
    pub fn new(config: ArmbandConfig) -> ArmlogResult<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        let emg_noise = Normal::new(0.0, config.emg_noise_std).map_err(noise_error)?;
        let imu_noise = Normal::new(0.0, config.imu_noise_std).map_err(noise_error)?;
        let device = DeviceInfo::new(config.device_name.clone(), SIMULATED_FIRMWARE);

        Ok(ArmbandSimulator {
            config,
            device,
            rng,
            emg_noise,
            imu_noise,
            clock: 0.0,
            link: Link::Searching,
            dropped_once: false,
            next_emg: 0.0,
            next_imu: 0.0,
            stream_emg: true,
            synced: false,
            lock: LockState::Locked,
            classified: Pose::Unknown,
            notifications: 0,
        })
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn config(&self) -> &ArmbandConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.link, Link::Connected { .. })
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.lock, LockState::Unlocked { .. })
    }

    /// Number of user-action notifications (vibrations) received
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    /// Advance simulated time by `dt` seconds and return the events that
    /// occurred, ordered by timestamp
    pub fn advance(&mut self, dt: f64) -> Vec<DeviceEvent> {
        let start = self.clock;
        let end = start + dt.max(0.0);
        self.clock = end;
        let mut events = Vec::new();

        self.update_link(start, end, &mut events);

        if let Link::Connected { since } = self.link {
            self.sample_streams(start.max(since), end, &mut events);

            if !self.synced && end >= since + SYNC_DELAY_SECS {
                self.synced = true;
                events.push(self.event(
                    since + SYNC_DELAY_SECS,
                    EventKind::ArmSynced {
                        arm: self.config.arm,
                        x_direction: XDirection::TowardWrist,
                    },
                ));
            }

            self.update_pose(end, since, &mut events);

            if let LockState::Unlocked { until: Some(until) } = self.lock {
                if end >= until {
                    self.lock = LockState::Locked;
                    events.push(self.event(until, EventKind::Locked));
                }
            }
        }

        events.sort_by_key(|event| event.timestamp);
        events
    }

    /// Apply a command from the host; may produce lock/unlock events
    pub fn apply_command(&mut self, command: DeviceCommand) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        if !self.is_connected() {
            debug!(?command, "Ignoring command while disconnected");
            return events;
        }

        match command {
            DeviceCommand::Unlock(mode) => {
                let until = match mode {
                    UnlockMode::Timed => Some(self.clock + self.config.timed_unlock_secs as f64),
                    UnlockMode::Hold => None,
                };
                if self.lock == LockState::Locked {
                    events.push(self.event(self.clock, EventKind::Unlocked));
                }
                self.lock = LockState::Unlocked { until };
            }
            DeviceCommand::Lock => {
                if self.is_unlocked() {
                    events.push(self.event(self.clock, EventKind::Locked));
                }
                self.lock = LockState::Locked;
            }
            DeviceCommand::NotifyUserAction => {
                self.notifications += 1;
                debug!(count = self.notifications, "Vibrating for user action");
            }
            DeviceCommand::SetStreamEmg(enabled) => {
                self.stream_emg = enabled;
                debug!(enabled, "EMG streaming toggled");
            }
        }
        events
    }

    fn event(&self, at: f64, kind: EventKind) -> DeviceEvent {
        DeviceEvent::new(DeviceTimestamp::from_secs_f64(at), kind)
    }

    fn update_link(&mut self, start: f64, end: f64, events: &mut Vec<DeviceEvent>) {
        match self.link {
            Link::Searching => {
                let connect_at = self.config.connect_delay_ms as f64 / 1000.0;
                if self.config.available && end >= connect_at {
                    self.connect(connect_at, events);
                }
            }
            Link::Connected { since } => {
                if let Some(after) = self.config.disconnect_after_secs {
                    let drop_at = since + after as f64;
                    if !self.dropped_once && end >= drop_at {
                        // Samples up to the drop still belong to this step
                        self.sample_streams(start.max(since), drop_at, events);
                        info!(at = drop_at, "Simulated armband dropping connection");
                        self.dropped_once = true;
                        self.link = Link::Lost { since: drop_at };
                        self.synced = false;
                        self.lock = LockState::Locked;
                        self.classified = Pose::Unknown;
                        events.push(self.event(drop_at, EventKind::Disconnected));
                        events.push(self.event(drop_at, EventKind::Unpaired));
                    }
                }
            }
            Link::Lost { since } => {
                if let Some(after) = self.config.reconnect_after_secs {
                    let reconnect_at = since + after as f64;
                    if end >= reconnect_at {
                        self.connect(reconnect_at, events);
                    }
                }
            }
        }
    }

    fn connect(&mut self, at: f64, events: &mut Vec<DeviceEvent>) {
        info!(device = %self.device, at, "Simulated armband pairing");
        self.link = Link::Connected { since: at };
        self.next_emg = at;
        self.next_imu = at;
        events.push(self.event(at, EventKind::Paired(self.device.clone())));
        events.push(self.event(at, EventKind::Connected));
    }

    fn sample_streams(&mut self, from: f64, end: f64, events: &mut Vec<DeviceEvent>) {
        let emg_period = 1.0 / self.config.emg_rate_hz as f64;
        let imu_period = 1.0 / self.config.imu_rate_hz as f64;
        self.next_emg = self.next_emg.max(from);
        self.next_imu = self.next_imu.max(from);

        while self.next_emg < end {
            let at = self.next_emg;
            if self.stream_emg {
                let frame = self.generate_emg_frame(at);
                events.push(self.event(at, EventKind::Emg(frame)));
            }
            self.next_emg += emg_period;
        }

        while self.next_imu < end {
            let at = self.next_imu;
            let (quat, gyro, accel) = self.generate_imu_sample(at);
            events.push(self.event(at, EventKind::Orientation(quat)));
            events.push(self.event(at, EventKind::Accelerometer(accel)));
            events.push(self.event(at, EventKind::Gyroscope(gyro)));
            self.next_imu += imu_period;
        }
    }

    fn update_pose(&mut self, end: f64, since: f64, events: &mut Vec<DeviceEvent>) {
        let pose = self.config.pattern.pose_at_time((end - since) as f32);
        if pose == self.classified {
            return;
        }
        self.classified = pose;

        // A locked band only reports the unlock gesture, and unlocks itself for it
        if pose == Pose::DoubleTap && self.lock == LockState::Locked {
            self.lock = LockState::Unlocked {
                until: Some(end + self.config.timed_unlock_secs as f64),
            };
            events.push(self.event(end, EventKind::Unlocked));
            events.push(self.event(end, EventKind::Pose(pose)));
        } else if self.is_unlocked() {
            events.push(self.event(end, EventKind::Pose(pose)));
        }
    }

    /// One EMG frame: pose-dependent muscle bursts plus electrode noise
    fn generate_emg_frame(&mut self, time: f64) -> EmgFrame {
        let pose = self.config.pattern.pose_at_time(self.connected_time(time));
        let activity = activation_for(pose);
        let t = time as f32;

        let mut frame = [0i8; EMG_CHANNELS];
        for (channel, slot) in frame.iter_mut().enumerate() {
            let amplitude = activity.level * activity.channel_weights[channel] * 100.0;
            let base_frequency = 80.0 + channel as f32 * 10.0;

            let mut value = amplitude * (2.0 * PI * base_frequency * t).sin();
            value += amplitude * 0.3 * self.rng.gen_range(-1.0..1.0);
            value += self.emg_noise.sample(&mut self.rng);

            *slot = value.round().clamp(i8::MIN as f32, i8::MAX as f32) as i8;
        }
        frame
    }

    /// Orientation, angular rate (deg/s) and gravity in the band frame (g)
    fn generate_imu_sample(&mut self, time: f64) -> (Quaternion, Vector3, Vector3) {
        let motion = &self.config.motion;
        let w = 2.0 * PI * motion.frequency_hz;
        let t = time as f32;

        let roll = motion.roll_amplitude * (w * t).sin();
        let pitch = motion.pitch_amplitude * (0.7 * w * t + 1.0).sin();
        let yaw = motion.yaw_amplitude * (0.5 * w * t).sin();

        let roll_rate = motion.roll_amplitude * w * (w * t).cos();
        let pitch_rate = motion.pitch_amplitude * 0.7 * w * (0.7 * w * t + 1.0).cos();
        let yaw_rate = motion.yaw_amplitude * 0.5 * w * (0.5 * w * t).cos();

        let gyro = Vector3::new(roll_rate.to_degrees(), pitch_rate.to_degrees(), yaw_rate.to_degrees());

        let accel = Vector3::new(
            -pitch.sin() + self.imu_noise.sample(&mut self.rng),
            roll.sin() * pitch.cos() + self.imu_noise.sample(&mut self.rng),
            roll.cos() * pitch.cos() + self.imu_noise.sample(&mut self.rng),
        );

        (Quaternion::from_euler(roll, pitch, yaw), gyro, accel)
    }

    fn connected_time(&self, time: f64) -> f32 {
        match self.link {
            Link::Connected { since } => (time - since) as f32,
            _ => 0.0,
        }
    }
}

fn noise_error(e: rand_distr::NormalError) -> ArmlogError {
    config_error!("Failed to create noise distribution: {}", e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: ArmbandConfig) -> ArmbandSimulator {
        ArmbandSimulator::new(ArmbandConfig {
            seed: Some(7),
            connect_delay_ms: 0,
            ..config
        })
        .unwrap()
    }

    fn run_for(sim: &mut ArmbandSimulator, secs: f64, step: f64) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        let steps = (secs / step).round() as usize;
        for _ in 0..steps {
            events.extend(sim.advance(step));
        }
        events
    }

    fn count(events: &[DeviceEvent], name: &str) -> usize {
        events.iter().filter(|e| e.kind.name() == name).count()
    }

    #[test]
    fn test_pairs_then_streams_at_configured_rates() {
        let mut sim = seeded(ArmbandConfig::default());
        let events = run_for(&mut sim, 1.0, 0.01);

        assert!(matches!(events[0].kind, EventKind::Paired(_)));
        assert!(matches!(events[1].kind, EventKind::Connected));

        let emg = count(&events, "emg");
        let imu = count(&events, "orientation");
        assert!((199..=201).contains(&emg), "got {emg} EMG frames");
        assert!((49..=51).contains(&imu), "got {imu} orientation samples");
        assert_eq!(count(&events, "accelerometer"), imu);
        assert_eq!(count(&events, "gyroscope"), imu);
    }

    #[test]
    fn test_events_are_time_ordered() {
        let mut sim = seeded(ArmbandConfig::default());
        let events = run_for(&mut sim, 3.0, 0.02);
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_same_seed_same_output() {
        let mut a = seeded(ArmbandConfig::default());
        let mut b = seeded(ArmbandConfig::default());
        let ea: Vec<_> = run_for(&mut a, 0.5, 0.01).into_iter().filter(|e| e.kind.name() == "emg").collect();
        let eb: Vec<_> = run_for(&mut b, 0.5, 0.01).into_iter().filter(|e| e.kind.name() == "emg").collect();
        assert_eq!(ea, eb);
    }

    #[test]
    fn test_unavailable_band_never_pairs() {
        let mut sim = seeded(ArmbandConfig {
            available: false,
            ..ArmbandConfig::default()
        });
        assert!(run_for(&mut sim, 2.0, 0.05).is_empty());
        assert!(!sim.is_connected());
    }

    #[test]
    fn test_arm_sync_after_connect() {
        let mut sim = seeded(ArmbandConfig {
            arm: Arm::Left,
            ..ArmbandConfig::default()
        });
        let events = run_for(&mut sim, 1.5, 0.05);
        let synced: Vec<_> = events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::ArmSynced { arm, .. } => Some(arm),
                _ => None,
            })
            .collect();
        assert_eq!(synced, vec![Arm::Left]);
    }

    #[test]
    fn test_poses_gated_by_lock() {
        let mut sim = seeded(ArmbandConfig {
            pattern: GesturePattern::Scripted {
                steps: vec![(0.5, Pose::Fist), (1.0, Pose::DoubleTap), (1.5, Pose::WaveIn)],
            },
            ..ArmbandConfig::default()
        });

        // Fist while locked is swallowed
        let events = run_for(&mut sim, 0.8, 0.05);
        assert_eq!(count(&events, "pose"), 0);

        // Double tap unlocks and is delivered
        let events = run_for(&mut sim, 0.4, 0.05);
        assert_eq!(count(&events, "unlocked"), 1);
        assert!(events.iter().any(|e| e.kind == EventKind::Pose(Pose::DoubleTap)));
        assert!(sim.is_unlocked());

        // Unlocked: the next pose comes through
        let events = run_for(&mut sim, 0.5, 0.05);
        assert!(events.iter().any(|e| e.kind == EventKind::Pose(Pose::WaveIn)));
    }

    #[test]
    fn test_timed_unlock_expires_and_hold_does_not() {
        let mut sim = seeded(ArmbandConfig {
            pattern: GesturePattern::Idle,
            timed_unlock_secs: 0.5,
            ..ArmbandConfig::default()
        });
        run_for(&mut sim, 0.1, 0.05);

        let events = sim.apply_command(DeviceCommand::Unlock(UnlockMode::Timed));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Unlocked);
        let events = run_for(&mut sim, 0.6, 0.05);
        assert_eq!(count(&events, "locked"), 1);
        assert!(!sim.is_unlocked());

        sim.apply_command(DeviceCommand::Unlock(UnlockMode::Hold));
        let events = run_for(&mut sim, 2.0, 0.05);
        assert_eq!(count(&events, "locked"), 0);
        assert!(sim.is_unlocked());

        let events = sim.apply_command(DeviceCommand::Lock);
        assert_eq!(events[0].kind, EventKind::Locked);
    }

    #[test]
    fn test_commands() {
        let mut sim = seeded(ArmbandConfig::default());
        assert!(sim.apply_command(DeviceCommand::NotifyUserAction).is_empty());
        assert_eq!(sim.notifications(), 0);

        run_for(&mut sim, 0.1, 0.05);
        sim.apply_command(DeviceCommand::NotifyUserAction);
        assert_eq!(sim.notifications(), 1);

        sim.apply_command(DeviceCommand::SetStreamEmg(false));
        let events = run_for(&mut sim, 0.5, 0.05);
        assert_eq!(count(&events, "emg"), 0);
        assert!(count(&events, "orientation") > 0);
    }

    #[test]
    fn test_disconnect_and_reconnect() {
        let mut sim = seeded(ArmbandConfig {
            disconnect_after_secs: Some(0.5),
            reconnect_after_secs: Some(0.5),
            ..ArmbandConfig::default()
        });

        let events = run_for(&mut sim, 0.7, 0.05);
        assert_eq!(count(&events, "disconnected"), 1);
        assert_eq!(count(&events, "unpaired"), 1);
        assert!(!sim.is_connected());

        let last_sample = events
            .iter()
            .filter(|e| e.kind.name() == "emg")
            .map(|e| e.timestamp)
            .max()
            .unwrap();
        assert!(last_sample < DeviceTimestamp::from_millis(500));

        let events = run_for(&mut sim, 0.5, 0.05);
        assert_eq!(count(&events, "paired"), 1);
        assert!(sim.is_connected());
        assert!(count(&events, "emg") > 0);
    }

    #[test]
    fn test_drop_inside_step_keeps_earlier_samples() {
        let mut sim = seeded(ArmbandConfig {
            disconnect_after_secs: Some(0.5),
            ..ArmbandConfig::default()
        });

        let mut events = sim.advance(0.3);
        events.extend(sim.advance(0.3));
        assert!(!sim.is_connected());

        let emg_times: Vec<_> = events
            .iter()
            .filter(|e| e.kind.name() == "emg")
            .map(|e| e.timestamp)
            .collect();
        let last = *emg_times.iter().max().unwrap();
        assert!(last >= DeviceTimestamp::from_millis(490));
        assert!(last < DeviceTimestamp::from_millis(500));
        assert!((99..=101).contains(&emg_times.len()), "got {} EMG frames", emg_times.len());
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let orientation_after_drop = events
            .iter()
            .filter(|e| e.kind.name() == "orientation")
            .any(|e| e.timestamp >= DeviceTimestamp::from_millis(500));
        assert!(!orientation_after_drop);
    }

    #[test]
    fn test_imu_reports_gravity() {
        let mut sim = seeded(ArmbandConfig {
            imu_noise_std: 0.0,
            ..ArmbandConfig::default()
        });
        for event in run_for(&mut sim, 1.0, 0.02) {
            if let EventKind::Accelerometer(accel) = event.kind {
                let magnitude = (accel.x * accel.x + accel.y * accel.y + accel.z * accel.z).sqrt();
                assert!((magnitude - 1.0).abs() < 1e-4);
            }
            if let EventKind::Orientation(quat) = event.kind {
                assert!((quat.norm() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(ArmbandConfig::default().validate().is_ok());

        let bad = ArmbandConfig { emg_rate_hz: 0.0, ..ArmbandConfig::default() };
        assert!(bad.validate().is_err());

        let bad = ArmbandConfig { reconnect_after_secs: Some(1.0), ..ArmbandConfig::default() };
        assert!(matches!(bad.validate(), Err(ArmlogError::InvalidConfig { .. })));

        let bad = ArmbandConfig { emg_noise_std: f32::NAN, ..ArmbandConfig::default() };
        assert!(ArmbandSimulator::new(bad).is_err());
    }
}
