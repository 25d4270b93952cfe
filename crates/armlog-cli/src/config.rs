//! Logger configuration
//!
//! Values come from three layers: built-in defaults, an optional JSON file,
//! then command-line flags.

use crate::cli::Args;
use armlog_core::{config_error, ArmlogResult};
use armlog_simulation::ArmbandConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default CSV output file
pub const DEFAULT_OUTPUT_FILE: &str = "testFile.csv";

/// Default polling period: 50 rows per second
pub const DEFAULT_TICK_MS: u64 = 20;

/// Default time to wait for an armband
pub const DEFAULT_DEVICE_TIMEOUT_MS: u64 = 10_000;

const MAX_TICK_MS: u64 = 1000;

/// Complete logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// CSV file, created or truncated at startup
    pub output_path: PathBuf,
    /// Stop after this many seconds; run until interrupted if `None`
    pub runtime_secs: Option<f64>,
    /// Milliseconds between logged rows
    pub tick_interval_ms: u64,
    /// Discovery window for the armband
    pub device_timeout_ms: u64,
    /// Write the column header row first
    pub write_header: bool,
    /// Render live values to stdout
    pub console: bool,
    /// Simulated armband settings
    pub simulation: ArmbandConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            runtime_secs: None,
            tick_interval_ms: DEFAULT_TICK_MS,
            device_timeout_ms: DEFAULT_DEVICE_TIMEOUT_MS,
            write_header: true,
            console: true,
            simulation: ArmbandConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> ArmlogResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error!("cannot read {}: {}", path.display(), e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ArmlogResult<Self> {
        serde_json::from_str(text).map_err(|e| config_error!("malformed config: {}", e))
    }

    pub fn to_json(&self) -> ArmlogResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| config_error!("cannot serialize config: {}", e))
    }

    /// Override file values with whatever was given on the command line
    pub fn apply_cli(&mut self, args: &Args) {
        if let Some(path) = &args.output_file {
            self.output_path = path.clone();
        }
        if let Some(secs) = args.runtime {
            self.runtime_secs = Some(secs);
        }
        if let Some(ms) = args.tick_ms {
            self.tick_interval_ms = ms;
        }
        if let Some(ms) = args.device_timeout_ms {
            self.device_timeout_ms = ms;
        }
        if args.no_header {
            self.write_header = false;
        }
        if args.quiet {
            self.console = false;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(pattern) = &args.pattern {
            self.simulation.pattern = pattern.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ArmlogResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(config_error!("output path is empty"));
        }
        if let Some(secs) = self.runtime_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(config_error!("runtime {}s must be a positive number", secs));
            }
            Duration::try_from_secs_f64(secs)
                .map_err(|e| config_error!("runtime {}s is out of range: {}", secs, e))?;
        }
        if !(1..=MAX_TICK_MS).contains(&self.tick_interval_ms) {
            return Err(config_error!(
                "tick interval {}ms must be between 1 and {}ms",
                self.tick_interval_ms,
                MAX_TICK_MS
            ));
        }
        self.simulation.validate()
    }

    /// How long the session may run, if bounded
    pub fn run_budget(&self) -> Option<Duration> {
        self.runtime_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_millis(self.device_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armlog_core::{ArmlogError, Pose};
    use armlog_simulation::GesturePattern;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.output_path, PathBuf::from("testFile.csv"));
        assert_eq!(config.tick_interval_ms, 20);
        assert_eq!(config.device_timeout_ms, 10_000);
        assert!(config.write_header);
        assert!(config.run_budget().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = LoggerConfig::default();
        config.runtime_secs = Some(1.5);
        config.simulation.pattern = GesturePattern::Hold { pose: Pose::WaveIn };
        config.simulation.seed = Some(99);

        let json = config.to_json().unwrap();
        let loaded = LoggerConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded.runtime_secs, Some(1.5));
        assert_eq!(loaded.simulation.pattern, GesturePattern::Hold { pose: Pose::WaveIn });
        assert_eq!(loaded.simulation.seed, Some(99));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("armlog-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "tick_interval_ms": 50, "simulation": { "emg_rate_hz": 100.0 } }"#)
            .unwrap();

        let config = LoggerConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.simulation.emg_rate_hz, 100.0);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.simulation.imu_rate_hz, 50.0);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = LoggerConfig::from_json_file(Path::new("/nonexistent/armlog.json"));
        assert!(matches!(result, Err(ArmlogError::InvalidConfig { .. })));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = LoggerConfig::from_json_str(r#"{ "runtime_secs": 10.0, "console": true }"#).unwrap();
        let args = Args::try_parse_from([
            "armlog", "-O", "run.csv", "-r", "0.5", "--quiet", "--seed", "4", "--pattern", "idle",
        ])
        .unwrap();
        config.apply_cli(&args);

        assert_eq!(config.output_path, PathBuf::from("run.csv"));
        assert_eq!(config.run_budget(), Some(Duration::from_millis(500)));
        assert!(!config.console);
        assert_eq!(config.simulation.seed, Some(4));
        assert_eq!(config.simulation.pattern, GesturePattern::Idle);
        assert!(config.write_header);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for runtime in [0.0, -1.0, f64::NAN] {
            let config = LoggerConfig {
                runtime_secs: Some(runtime),
                ..LoggerConfig::default()
            };
            assert!(config.validate().is_err());
        }

        let config = LoggerConfig {
            tick_interval_ms: 0,
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LoggerConfig {
            output_path: PathBuf::new(),
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = LoggerConfig::default();
        config.simulation.emg_rate_hz = 0.0;
        assert!(config.validate().is_err());
    }
}
