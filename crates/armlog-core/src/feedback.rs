//! Commands sent back to the armband, and the pose feedback policy

use crate::pose::Pose;
use serde::{Deserialize, Serialize};

/// How long an unlock lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockMode {
    /// Relock after a short period of inactivity
    Timed,
    /// Stay unlocked until told otherwise
    Hold,
}

/// Requests from the logger to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceCommand {
    Unlock(UnlockMode),
    Lock,
    /// Short vibration acknowledging that a gesture was acted on
    NotifyUserAction,
    SetStreamEmg(bool),
}

/// Feedback for a pose change.
///
/// A deliberate gesture holds the unlock so it can be sustained, and buzzes
/// the band. Rest or unknown only extends a timed unlock, so the band locks
/// again after inactivity.
pub fn pose_feedback(pose: Pose) -> Vec<DeviceCommand> {
    if pose.is_active() {
        vec![
            DeviceCommand::Unlock(UnlockMode::Hold),
            DeviceCommand::NotifyUserAction,
        ]
    } else {
        vec![DeviceCommand::Unlock(UnlockMode::Timed)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_pose_holds_unlock_and_notifies() {
        for pose in [Pose::Fist, Pose::WaveIn, Pose::WaveOut, Pose::FingersSpread, Pose::DoubleTap] {
            assert_eq!(
                pose_feedback(pose),
                vec![DeviceCommand::Unlock(UnlockMode::Hold), DeviceCommand::NotifyUserAction]
            );
        }
    }

    #[test]
    fn test_rest_extends_timed_unlock() {
        assert_eq!(pose_feedback(Pose::Rest), vec![DeviceCommand::Unlock(UnlockMode::Timed)]);
        assert_eq!(pose_feedback(Pose::Unknown), vec![DeviceCommand::Unlock(UnlockMode::Timed)]);
    }
}
