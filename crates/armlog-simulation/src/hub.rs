//! Real-time hub around the simulated armband
//!
//! The simulator runs on its own tokio task and advances with wall-clock
//! time. Events reach the consumer through an mpsc channel; feedback
//! commands travel back through another.

use crate::armband_simulator::{ArmbandConfig, ArmbandSimulator};
use armlog_core::{ArmlogError, ArmlogResult, DeviceCommand, DeviceEvent, DeviceInfo, EventKind};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How often the simulator task advances
const STEP: Duration = Duration::from_millis(5);

/// Capacity of the event channel
const EVENT_BUFFER: usize = 4096;

/// Handle to a running simulated armband
pub struct SimulatedHub {
    events: mpsc::Receiver<DeviceEvent>,
    commands: mpsc::Sender<DeviceCommand>,
    /// Events read during discovery, replayed before the channel
    backlog: VecDeque<DeviceEvent>,
    task: JoinHandle<()>,
}

impl SimulatedHub {
    /// Start the simulator task. Must be called inside a tokio runtime.
    pub fn start(config: ArmbandConfig) -> ArmlogResult<Self> {
        let simulator = ArmbandSimulator::new(config)?;
        let (event_sender, events) = mpsc::channel(EVENT_BUFFER);
        let (commands, command_receiver) = mpsc::channel(32);

        let task = tokio::spawn(run_simulator(simulator, event_sender, command_receiver));

        Ok(SimulatedHub {
            events,
            commands,
            backlog: VecDeque::new(),
            task,
        })
    }

    /// Wait until an armband pairs, or fail once `timeout` has passed
    pub async fn wait_for_device(&mut self, timeout: Duration) -> ArmlogResult<DeviceInfo> {
        let deadline = Instant::now() + timeout;
        loop {
            let event = match tokio::time::timeout_at(deadline, self.events.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    return Err(ArmlogError::DeviceError {
                        reason: "hub stopped before a device paired".to_string(),
                    })
                }
                Err(_) => {
                    return Err(ArmlogError::DeviceNotFound {
                        timeout_ms: timeout.as_millis() as u64,
                    })
                }
            };

            let paired = match &event.kind {
                EventKind::Paired(device) => Some(device.clone()),
                _ => None,
            };
            self.backlog.push_back(event);
            if let Some(device) = paired {
                info!(device = %device, "Found an armband");
                return Ok(device);
            }
        }
    }

    /// Next pending event without waiting
    pub fn try_next_event(&mut self) -> Option<DeviceEvent> {
        self.backlog
            .pop_front()
            .or_else(|| self.events.try_recv().ok())
    }

    /// Next event, waiting for one. `None` once the hub has stopped.
    pub async fn next_event(&mut self) -> Option<DeviceEvent> {
        match self.backlog.pop_front() {
            Some(event) => Some(event),
            None => self.events.recv().await,
        }
    }

    /// Forward a command to the device
    pub async fn send_command(&self, command: DeviceCommand) -> ArmlogResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ArmlogError::DeviceError {
                reason: "hub is no longer running".to_string(),
            })
    }

    /// Whether the simulator task is still producing events
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the simulator task
    pub fn shutdown(self) {
        self.task.abort();
        debug!("Simulated hub stopped");
    }
}

impl Drop for SimulatedHub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_simulator(
    mut simulator: ArmbandSimulator,
    events: mpsc::Sender<DeviceEvent>,
    mut commands: mpsc::Receiver<DeviceCommand>,
) {
    let mut ticker = interval(STEP);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    debug!(
        device = %simulator.device(),
        emg_rate = simulator.config().emg_rate_hz,
        imu_rate = simulator.config().imu_rate_hz,
        pattern = simulator.config().pattern.description(),
        "Simulated hub running"
    );

    loop {
        let produced = tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last);
                last = now;
                simulator.advance(dt.as_secs_f64())
            }

            command = commands.recv() => match command {
                Some(command) => simulator.apply_command(command),
                None => {
                    debug!("Command channel closed, stopping simulator");
                    return;
                }
            }
        };

        for event in produced {
            if events.send(event).await.is_err() {
                warn!("Event receiver dropped, stopping simulator");
                return;
            }
        }
    }
}
