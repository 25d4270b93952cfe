//! Polling session: drains device events into the aggregator and logs one
//! row per tick

use crate::config::LoggerConfig;
use anyhow::{Context, Result};
use armlog_core::{
    render_console, render_header, render_record, ArmbandListener, DeviceTimestamp, SampleState,
};
use armlog_simulation::SimulatedHub;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::future::Future;
use std::io::Write;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The configured runtime elapsed
    RuntimeElapsed,
    /// Shutdown was requested (Ctrl-C)
    Interrupted,
    /// The device hub stopped producing events
    HubClosed,
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub started_at: DateTime<Local>,
    pub rows_written: u64,
    pub events_dispatched: u64,
    pub commands_sent: u64,
    pub elapsed_secs: f64,
    /// Device clock at the first and last logged row that had one
    pub first_device_time: Option<DeviceTimestamp>,
    pub last_device_time: Option<DeviceTimestamp>,
    pub stop_reason: Option<StopReason>,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            started_at: Local::now(),
            rows_written: 0,
            events_dispatched: 0,
            commands_sent: 0,
            elapsed_secs: 0.0,
            first_device_time: None,
            last_device_time: None,
            stop_reason: None,
        }
    }

    /// Device clock time covered by the log, if any row carried a device timestamp
    pub fn device_span(&self) -> Option<Duration> {
        let (first, last) = self.first_device_time.zip(self.last_device_time)?;
        match last.duration_since(first) {
            Ok(span) => Some(span),
            Err(e) => {
                warn!("Device clock went backwards: {}", e);
                None
            }
        }
    }
}

/// Owns the aggregator for the lifetime of one logging run
pub struct LoggingSession<S: Write, C: Write> {
    hub: SimulatedHub,
    listener: ArmbandListener,
    sink: S,
    console: Option<C>,
    tick: Duration,
    budget: Option<Duration>,
    write_header: bool,
    stats: SessionStats,
}

impl<S: Write, C: Write> LoggingSession<S, C> {
    pub fn new(hub: SimulatedHub, sink: S, console: Option<C>, config: &LoggerConfig) -> Self {
        Self {
            hub,
            listener: ArmbandListener::new(),
            sink,
            console,
            tick: config.tick_interval(),
            budget: config.run_budget(),
            write_header: config.write_header,
            stats: SessionStats::new(),
        }
    }

    pub fn state(&self) -> &SampleState {
        self.listener.state()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Run until the budget elapses, `shutdown` resolves, or the hub stops.
    /// Sink and console write failures end the session with an error.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<StopReason>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if self.write_header {
            render_header(&mut self.sink).context("failed to write CSV header")?;
        }

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let start = Instant::now();

        self.stats.started_at = Local::now();
        info!(
            tick_ms = self.tick.as_millis() as u64,
            budget = ?self.budget,
            "Logging session started"
        );

        let reason = loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break StopReason::Interrupted;
                }
            }

            let dispatched = self.dispatch_pending();
            self.forward_commands().await;

            if dispatched == 0 && !self.hub.is_running() {
                warn!("Device hub stopped");
                break StopReason::HubClosed;
            }

            let elapsed = start.elapsed();
            self.log_row(elapsed.as_secs_f64())?;

            if self.budget.is_some_and(|budget| elapsed >= budget) {
                break StopReason::RuntimeElapsed;
            }
        };

        self.sink.flush().context("failed to flush CSV output")?;
        self.stats.elapsed_secs = start.elapsed().as_secs_f64();
        self.stats.stop_reason = Some(reason);

        info!(
            reason = ?reason,
            rows = self.stats.rows_written,
            events = self.stats.events_dispatched,
            device_span = ?self.stats.device_span(),
            "Logging session finished"
        );
        Ok(reason)
    }

    /// Hand every event the hub has buffered to the listener
    fn dispatch_pending(&mut self) -> u64 {
        let mut count = 0;
        while let Some(event) = self.hub.try_next_event() {
            trace!(event = event.kind.name(), timestamp = %event.timestamp, "Dispatching");
            event.dispatch(&mut self.listener);
            count += 1;
        }
        self.stats.events_dispatched += count;
        count
    }

    async fn forward_commands(&mut self) {
        for command in self.listener.drain_commands() {
            debug!(?command, "Sending device command");
            match self.hub.send_command(command).await {
                Ok(()) => self.stats.commands_sent += 1,
                Err(e) => warn!("Dropped device command: {}", e),
            }
        }
    }

    fn log_row(&mut self, elapsed: f64) -> Result<()> {
        let state = self.listener.state();
        let device_time = state.timestamp();
        trace!(elapsed, device_time = %device_time, "Logging row");
        if device_time != DeviceTimestamp::ZERO {
            self.stats.first_device_time.get_or_insert(device_time);
            self.stats.last_device_time = Some(device_time);
        }
        if let Some(console) = self.console.as_mut() {
            render_console(console, state, elapsed).context("failed to render console output")?;
        }
        render_record(&mut self.sink, state, elapsed).context("failed to write CSV record")?;
        self.sink.flush().context("failed to flush CSV output")?;
        self.stats.rows_written += 1;
        Ok(())
    }

    /// Stop the hub and give back the sink
    pub fn into_sink(self) -> S {
        self.hub.shutdown();
        self.sink
    }
}
