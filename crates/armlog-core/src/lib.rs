//! armlog-core: telemetry types and aggregation for an 8-channel EMG armband
//!
//! The aggregator ([`SampleState`]) holds the latest value of every sensor
//! stream; [`ArmbandListener`] feeds it from device events and [`render`]
//! turns it into console text or CSV records.

pub mod error;
pub mod event;
pub mod feedback;
pub mod listener;
pub mod orientation;
pub mod pose;
pub mod render;
pub mod sample_state;
pub mod timestamp;
pub mod types;

pub use error::{ArmlogError, ArmlogResult};
pub use event::{DeviceEvent, DeviceListener, EventKind};
pub use feedback::{pose_feedback, DeviceCommand, UnlockMode};
pub use listener::ArmbandListener;
pub use orientation::{EulerAngles, Quaternion};
pub use pose::{Arm, Pose, XDirection};
pub use render::{format_record, render_console, render_header, render_record, Record, CSV_HEADER};
pub use sample_state::SampleState;
pub use timestamp::DeviceTimestamp;
pub use types::*;
