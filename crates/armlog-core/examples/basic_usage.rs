//! Basic usage of armlog-core
//!
//! Feeds a handful of hand-written device events through the listener and
//! prints the resulting console block and CSV record.
//!
//! Run with: cargo run -p armlog-core --example basic_usage

use armlog_core::{
    render_console, render_header, render_record, ArmbandListener, DeviceEvent, DeviceInfo,
    DeviceTimestamp, EventKind, Pose, Quaternion, Record, Vector3, Arm, XDirection,
};
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    println!("=== armlog-core basic usage ===\n");

    let events = vec![
        EventKind::Paired(DeviceInfo::new("demo armband", "1.5.1970")),
        EventKind::Connected,
        EventKind::ArmSynced {
            arm: Arm::Right,
            x_direction: XDirection::TowardWrist,
        },
        EventKind::Emg([1, -2, 3, 0, 0, 0, 0, 0]),
        EventKind::Orientation(Quaternion::from_euler(0.0, 0.0, std::f32::consts::FRAC_PI_2)),
        EventKind::Gyroscope(Vector3::new(0.0, 0.0, 45.0)),
        EventKind::Accelerometer(Vector3::new(0.0, 0.0, 1.0)),
        EventKind::Unlocked,
        EventKind::Pose(Pose::Fist),
    ];

    let mut listener = ArmbandListener::new();
    for (i, kind) in events.into_iter().enumerate() {
        let event = DeviceEvent::new(DeviceTimestamp::from_millis(i as u64 * 5), kind);
        event.dispatch(&mut listener);
    }

    println!("Feedback for the device: {:?}\n", listener.drain_commands());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_console(&mut out, listener.state(), 0.045)?;
    writeln!(out)?;

    let mut csv = Vec::new();
    render_header(&mut csv)?;
    render_record(&mut csv, listener.state(), 0.045)?;
    let text = String::from_utf8(csv)?;
    print!("{}", text);

    if let Some(line) = text.lines().nth(1) {
        let record: Record = line.parse()?;
        println!("\nYaw read back from CSV: {:.4} rad", record.angles.yaw);
    }

    Ok(())
}
