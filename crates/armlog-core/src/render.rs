//! Console and CSV rendering of a [`SampleState`]
//!
//! Both renderers are read-only views. The elapsed time is supplied by the
//! caller; the state never tracks wall-clock time itself.

use crate::error::{ArmlogError, ArmlogResult};
use crate::format_error;
use crate::orientation::EulerAngles;
use crate::pose::Pose;
use crate::sample_state::SampleState;
use crate::types::{EmgFrame, Vector3, EMG_CHANNELS};
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

/// Column names matching [`render_record`]
pub const CSV_HEADER: &str = "TIME,EMG[0],EMG[1],EMG[2],EMG[3],EMG[4],EMG[5],EMG[6],EMG[7],\
ROLL,PITCH,YAW,OMEGAX,OMEGAY,OMEGAZ,XACCEL,YACCEL,ZACCEL,POSE";

/// Number of comma-separated fields in a record
pub const CSV_COLUMNS: usize = 1 + EMG_CHANNELS + 3 + 3 + 3 + 1;

fn join<T: Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Format one CSV record (without the trailing newline)
pub fn format_record(state: &SampleState, elapsed: f64) -> String {
    format!(
        "{},{},{},{},{},{}",
        elapsed,
        join(state.emg()),
        join(state.angles().to_array()),
        join(state.angular_velocity().to_array()),
        join(state.acceleration().to_array()),
        state.pose(),
    )
}

/// Write one CSV record line
pub fn render_record<W: Write>(out: &mut W, state: &SampleState, elapsed: f64) -> io::Result<()> {
    writeln!(out, "{}", format_record(state, elapsed))
}

/// Write the CSV header line
pub fn render_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)
}

/// Write the human-readable block, returning the cursor to the line start first
pub fn render_console<W: Write>(out: &mut W, state: &SampleState, elapsed: f64) -> io::Result<()> {
    write!(out, "\r")?;
    writeln!(out, "Timestamp: {}", elapsed)?;
    writeln!(out, "EMG Data")?;
    writeln!(out, "{}", join(state.emg()))?;
    writeln!(out, "Orientation Data")?;
    writeln!(out, "{}", join(state.angles().to_array()))?;
    writeln!(out, "Angular Velocity Data")?;
    writeln!(out, "{}", join(state.angular_velocity().to_array()))?;
    writeln!(out, "Acceleration Data")?;
    writeln!(out, "{}", join(state.acceleration().to_array()))?;
    writeln!(out, "{}", state.pose())?;
    out.flush()
}

/// A CSV record read back into typed columns
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub time: f64,
    pub emg: EmgFrame,
    pub angles: EulerAngles,
    pub angular_velocity: Vector3,
    pub acceleration: Vector3,
    pub pose: Pose,
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> ArmlogResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| format_error!("invalid {} value '{}'", name, raw))
}

impl FromStr for Record {
    type Err = ArmlogError;

    fn from_str(line: &str) -> ArmlogResult<Self> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != CSV_COLUMNS {
            return Err(format_error!("expected {} fields, found {}", CSV_COLUMNS, fields.len()));
        }

        let mut emg = [0i8; EMG_CHANNELS];
        for (slot, raw) in emg.iter_mut().zip(&fields[1..=EMG_CHANNELS]) {
            *slot = parse_field("EMG", raw)?;
        }

        let float = |index: usize, name: &str| parse_field::<f32>(name, fields[index]);
        Ok(Record {
            time: parse_field("TIME", fields[0])?,
            emg,
            angles: EulerAngles {
                roll: float(9, "ROLL")?,
                pitch: float(10, "PITCH")?,
                yaw: float(11, "YAW")?,
            },
            angular_velocity: Vector3::new(
                float(12, "OMEGAX")?,
                float(13, "OMEGAY")?,
                float(14, "OMEGAZ")?,
            ),
            acceleration: Vector3::new(
                float(15, "XACCEL")?,
                float(16, "YACCEL")?,
                float(17, "ZACCEL")?,
            ),
            pose: fields[18].trim().parse()?,
        })
    }
}
