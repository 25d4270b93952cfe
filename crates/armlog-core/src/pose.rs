//! Gesture classification and arm-sync labels

use crate::error::{ArmlogError, ArmlogResult};
use crate::format_error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gesture reported by the armband's on-board classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pose {
    Rest,
    Fist,
    WaveIn,
    WaveOut,
    FingersSpread,
    DoubleTap,
    #[default]
    Unknown,
}

impl Pose {
    pub const ALL: [Pose; 7] = [
        Pose::Rest,
        Pose::Fist,
        Pose::WaveIn,
        Pose::WaveOut,
        Pose::FingersSpread,
        Pose::DoubleTap,
        Pose::Unknown,
    ];

    /// Label used in logs and on the console
    pub fn as_str(&self) -> &'static str {
        match self {
            Pose::Rest => "rest",
            Pose::Fist => "fist",
            Pose::WaveIn => "waveIn",
            Pose::WaveOut => "waveOut",
            Pose::FingersSpread => "fingersSpread",
            Pose::DoubleTap => "doubleTap",
            Pose::Unknown => "unknown",
        }
    }

    /// True for a deliberate gesture, false for rest or an unclassified state
    pub fn is_active(&self) -> bool {
        !matches!(self, Pose::Rest | Pose::Unknown)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pose {
    type Err = ArmlogError;

    fn from_str(s: &str) -> ArmlogResult<Self> {
        Pose::ALL
            .into_iter()
            .find(|pose| pose.as_str() == s)
            .ok_or_else(|| format_error!("unknown pose label '{}'", s))
    }
}

/// Arm the band was synced on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arm {
    Left,
    Right,
    #[default]
    Unknown,
}

/// Which way the band's +x axis points along the forearm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XDirection {
    TowardWrist,
    TowardElbow,
    #[default]
    Unknown,
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::Left => write!(f, "left"),
            Arm::Right => write!(f, "right"),
            Arm::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for XDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XDirection::TowardWrist => write!(f, "toward wrist"),
            XDirection::TowardElbow => write!(f, "toward elbow"),
            XDirection::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_labels_parse_back() {
        for pose in Pose::ALL {
            assert_eq!(pose.to_string().parse::<Pose>().unwrap(), pose);
        }
        assert!("clap".parse::<Pose>().is_err());
    }

    #[test]
    fn test_active_poses() {
        assert!(Pose::Fist.is_active());
        assert!(Pose::DoubleTap.is_active());
        assert!(!Pose::Rest.is_active());
        assert!(!Pose::Unknown.is_active());
        assert_eq!(Pose::default(), Pose::Unknown);
    }
}
