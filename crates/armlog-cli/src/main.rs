//! armlog - EMG armband data logger
//!
//! Connects to an armband, keeps the latest sample of every sensor stream and
//! appends one CSV row per tick until the runtime elapses or Ctrl-C.

mod cli;
mod config;
mod session;

use anyhow::{Context, Result};
use armlog_core::DeviceCommand;
use armlog_simulation::SimulatedHub;
use clap::error::ErrorKind;
use clap::Parser;
use cli::Args;
use config::LoggerConfig;
use session::LoggingSession;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            if let Err(io_err) = e.print() {
                eprintln!("Error: could not print help: {}", io_err);
            }
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };

    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout belongs to the console renderer
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => LoggerConfig::from_json_file(path)?,
        None => LoggerConfig::default(),
    };
    config.apply_cli(&args);
    config.validate().context("invalid logger configuration")?;
    match config.to_json() {
        Ok(json) => debug!(config = %json, "Effective configuration"),
        Err(e) => warn!("Could not render configuration: {}", e),
    }

    info!(started = %chrono::Local::now().to_rfc3339(), "armlog starting");

    let mut hub = SimulatedHub::start(config.simulation.clone())
        .context("failed to start the device hub")?;
    let device = hub
        .wait_for_device(config.device_timeout())
        .await
        .context("no armband connected")?;
    info!(device = %device, "Connected");

    hub.send_command(DeviceCommand::SetStreamEmg(true))
        .await
        .context("failed to enable EMG streaming")?;

    let file = File::create(&config.output_path)
        .with_context(|| format!("failed to create {}", config.output_path.display()))?;
    info!(path = %config.output_path.display(), "Logging to file");

    let console = config.console.then(io::stdout);
    let mut session = LoggingSession::new(hub, BufWriter::new(file), console, &config);

    let reason = session.run(shutdown_signal()).await?;
    let stats = session.stats().clone();
    session.into_sink();

    match serde_json::to_string(&stats) {
        Ok(summary) => info!(%summary, "Session summary"),
        Err(e) => warn!("Could not summarize session: {}", e),
    }
    info!(?reason, rows = stats.rows_written, "Done");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}
