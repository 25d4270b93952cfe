//! armlog-simulation: a simulated EMG armband
//!
//! Generates pairing, EMG, IMU, pose and lock events with realistic timing so
//! the logger can run without hardware.

pub mod armband_simulator;
pub mod gesture_patterns;
pub mod hub;

pub use armband_simulator::*;
pub use gesture_patterns::*;
pub use hub::*;
