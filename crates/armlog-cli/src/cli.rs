//! Command-line arguments

use armlog_simulation::GesturePattern;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "armlog")]
#[command(about = "Log EMG armband telemetry to a CSV file", long_about = None)]
pub struct Args {
    /// File to save results to [default: testFile.csv]
    #[arg(short = 'O', long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop after this many seconds (fractional allowed; runs until Ctrl-C if omitted)
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_runtime)]
    pub runtime: Option<f64>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Milliseconds between logged rows [default: 20]
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// How long to look for an armband before giving up [default: 10000]
    #[arg(long, value_name = "MS")]
    pub device_timeout_ms: Option<u64>,

    /// Do not write the column header row
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Do not render live values to the console
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Seed for the simulated armband
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gesture preset the simulated wearer performs (idle, demo, grip, swipes, unlock-then-spread)
    #[arg(long, value_name = "NAME", value_parser = parse_pattern)]
    pub pattern: Option<GesturePattern>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_runtime(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err("runtime must be a positive number of seconds".to_string())
    }
}

fn parse_pattern(name: &str) -> Result<GesturePattern, String> {
    GesturePattern::preset(name).ok_or_else(|| {
        let known: Vec<_> = GesturePattern::presets().into_iter().map(|(preset, _)| preset).collect();
        format!("unknown pattern '{}', expected one of: {}", name, known.join(", "))
    })
}
